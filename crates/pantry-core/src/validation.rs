//! # Validation Module
//!
//! Input validation for the two things a user (or a scanner) types: barcodes
//! and quantities.
//!
//! ## Usage
//! ```rust
//! use pantry_core::validation::{validate_barcode, validate_quantity_input};
//!
//! assert_eq!(validate_barcode(" 4006381333931\r").unwrap(), "4006381333931");
//! assert_eq!(validate_quantity_input("").unwrap(), "1");
//! assert!(validate_quantity_input("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::{DEFAULT_QUANTITY, MAX_BARCODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a barcode and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_BARCODE_LEN` bytes
/// - No control characters (scanners sometimes leave a stray `\r`, which
///   trimming already removes)
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if barcode.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "contains control characters".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Validates the quantity input field.
///
/// ## Rules
/// - Blank means `DEFAULT_QUANTITY`
/// - Otherwise must parse as a finite number greater than zero; Grocy
///   accepts fractional amounts, so `0.5` is fine
///
/// ## Returns
/// The trimmed input text, unchanged. The backend gets exactly what the user
/// typed.
pub fn validate_quantity_input(input: &str) -> ValidationResult<String> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(DEFAULT_QUANTITY.to_string());
    }

    match input.parse::<f64>() {
        Ok(q) if q.is_finite() && q > 0.0 => Ok(input.to_string()),
        _ => Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }),
    }
}
