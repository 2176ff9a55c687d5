//! # Error Types
//!
//! Domain-specific error types for pantry-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pantry-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pantry-client errors (separate crate)                                 │
//! │  └── ClientError      - Config, transport and decode failures          │
//! │                                                                         │
//! │  scanner app errors                                                    │
//! │  └── CameraError / DecoderError / AppError                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → status text shown to the user     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised while building requests or parsing user input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Action name did not match purchase / consume / open.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Symbology name is not one the decoder supports.
    #[error("Unknown symbology: {0}")]
    UnknownSymbology(String),

    /// Facing mode is neither `environment` nor `user`.
    #[error("Unknown facing mode: {0}")]
    UnknownFacingMode(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Text for the status line.
    ///
    /// Validation failures drop their prefix so the user reads
    /// `Error: quantity must be a positive number`.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Validation(inner) => inner.to_string(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The `Display` text is what ends up after `"Error: "` in the status line,
/// so keep it short and lowercase.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be a positive number.
    #[error("{field} must be a positive number")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a positive number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.user_message(), "barcode is required");
        assert_eq!(
            CoreError::UnknownAction("buy-all".into()).user_message(),
            "Unknown action: buy-all"
        );
    }
}
