//! # pantry-client: Backend Client for pantry-scan
//!
//! This crate connects the scanner to its inventory backend (a small proxy
//! in front of Grocy) and owns the scanner's configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Client Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                ScanSessionController (apps/scanner)              │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ &dyn InventoryApi                       │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ HttpInventoryApi│ │  RetryPolicy   │  │  ScannerConfig         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ check-barcode  │  │ lookups only,  │  │ [backend] [scanner]    │    │
//! │  │ purchase /     │  │ Network and    │  │ [lookup] sections,     │    │
//! │  │ consume / open │  │ Timeout errors │  │ PANTRY_SCAN_* env      │    │
//! │  │ health         │  │                │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  Every request is built fresh per call; nothing is cached between      │
//! │  calls except the pooled HTTP connection.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - `InventoryApi` trait and its reqwest implementation
//! - [`config`] - Scanner configuration (backend URL, device, symbologies)
//! - [`error`] - Client error types
//! - [`retry`] - Bounded exponential backoff for lookups
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_client::{HttpInventoryApi, InventoryApi, ScannerConfig};
//!
//! let config = ScannerConfig::load(None)?;
//! config.validate()?;
//! let api = HttpInventoryApi::from_config(&config)?;
//!
//! let response = api.check_barcode("4006381333931").await?;
//! println!("{:?}", response);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod retry;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{Endpoints, HttpInventoryApi, InventoryApi};
pub use config::{BackendSettings, LookupSettings, ScannerConfig, ScannerSettings, CONSOLE_DEVICE};
pub use error::{ClientError, ClientResult};
pub use retry::RetryPolicy;
