//! # Scanner Error Types
//!
//! Device, decoder and app-level errors for the scanner binary.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in pantry-scan                            │
//! │                                                                         │
//! │  Source                     Controller reaction                         │
//! │  ──────                     ───────────────────                         │
//! │                                                                         │
//! │  CameraError ─────────────► "Failed to access the camera..."            │
//! │                             scanning stays disabled for the session     │
//! │                                                                         │
//! │  DecoderError ────────────► "Failed to initialize scanner."             │
//! │                             scan attempt aborted, back to idle          │
//! │                                                                         │
//! │  ClientError (transport) ─► "Error checking barcode..." / HTTP reason   │
//! │                             lookup: barcode unmarked for rescan         │
//! │                                                                         │
//! │  {status:"error"} payload ► "Error: {message}" (not an error type)      │
//! │                                                                         │
//! │  AppError ────────────────► only for setup and one-shot commands;       │
//! │                             surfaces through anyhow in main             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside a scan session nothing propagates to the caller: every failure
//! becomes status text and a `tracing` event.

use pantry_client::ClientError;
use pantry_core::CoreError;
use thiserror::Error;

// =============================================================================
// Camera Error
// =============================================================================

/// Failure to acquire a frame source.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The device exists but we may not read it.
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// No such device.
    #[error("No camera device available: {0}")]
    NoDevice(String),

    #[error("Camera I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotFound => CameraError::NoDevice(err.to_string()),
            _ => CameraError::Io(err.to_string()),
        }
    }
}

// =============================================================================
// Decoder Error
// =============================================================================

/// Failure to start continuous decoding.
#[derive(Debug, Error)]
pub enum DecoderError {
    /// No active camera stream to bind to.
    #[error("No camera stream available")]
    NoStream,

    #[error("Decoder initialization failed: {0}")]
    Init(String),
}

// =============================================================================
// App Error
// =============================================================================

/// Errors surfaced by setup and the one-shot commands.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{}", .0.user_message())]
    Core(#[from] CoreError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Decoder(#[from] DecoderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for scanner operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::ValidationError;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_errors_map_to_camera_errors() {
        let denied: CameraError = IoError::new(ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(denied, CameraError::PermissionDenied(_)));

        let missing: CameraError = IoError::new(ErrorKind::NotFound, "gone").into();
        assert!(matches!(missing, CameraError::NoDevice(_)));

        let other: CameraError = IoError::new(ErrorKind::BrokenPipe, "eh").into();
        assert!(matches!(other, CameraError::Io(_)));
    }

    #[test]
    fn test_app_error_display() {
        let err: AppError = CoreError::from(ValidationError::MustBePositive {
            field: "quantity".into(),
        })
        .into();
        assert_eq!(err.to_string(), "quantity must be a positive number");

        let err: AppError = ClientError::Timeout.into();
        assert_eq!(err.to_string(), "Request timed out");

        let err: AppError = DecoderError::NoStream.into();
        assert_eq!(err.to_string(), "No camera stream available");
    }
}
