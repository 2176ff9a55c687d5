//! # pantry-core: Pure Scan Session Logic
//!
//! Everything the scanner decides without performing I/O: scan state, the
//! handled-set gate, request/response types for the inventory backend,
//! input validation and the status text shown to the user.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      pantry-scan Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/scanner (pantry-scan CLI)                  │   │
//! │  │   Camera ──► Decoder ──► ScanSessionController ──► StatusView   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pantry-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  session  │  │  status   │  │ validation│  │   │
//! │  │   │ Requests  │  │ ScanState │  │  Status   │  │  barcode  │  │   │
//! │  │   │ Responses │  │ handled   │  │  text     │  │  quantity │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO DEVICES                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                pantry-client (HTTP + config)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use pantry_core::session::{Detection, ScanState};
//!
//! let mut state = ScanState::new();
//! state.begin_session();
//!
//! // The decoder reports the same code on consecutive frames
//! assert_eq!(state.register_detection("4006381333931"), Detection::Fresh);
//! assert_eq!(state.register_detection("4006381333931"), Detection::Duplicate);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod path;
pub mod session;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use session::{Detection, ScanPhase, ScanState};
pub use status::Status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest barcode accepted from any source.
pub const MAX_BARCODE_LEN: usize = 128;

/// Quantity used when the quantity input is blank.
pub const DEFAULT_QUANTITY: &str = "1";

/// Shown when the backend reports an error without a message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Shown when the backend replies with a status we do not know.
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from backend";
