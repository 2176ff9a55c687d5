//! # CLI Commands Module
//!
//! One module per `pantry-scan` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── scan.rs     ◄─── Interactive scan session (default)
//! ├── lookup.rs   ◄─── One-shot barcode lookup
//! ├── action.rs   ◄─── One-shot purchase / consume / open
//! ├── health.rs   ◄─── Backend health probe
//! └── config.rs   ◄─── config show / config init
//! ```
//!
//! The one-shot commands reuse the session's status texts, so a scripted
//! `pantry-scan lookup 123` prints exactly what the interactive session
//! would show for the same response.

pub mod action;
pub mod config;
pub mod health;
pub mod lookup;
pub mod scan;

#[cfg(test)]
pub(crate) mod testing;
