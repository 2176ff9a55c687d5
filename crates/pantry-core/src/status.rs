//! # Status Messages
//!
//! Every line of text the scanner can put in its single status region.
//! Rendering lives here so the exact wording is testable without a view.

use crate::types::{ActionOutcome, LookupOutcome, ProductAction};

/// A user-visible status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    CameraUnavailable,
    InitializingScanner,
    ScannerInitFailed,
    Scanning,
    ScanStopped,
    BarcodeDetected(String),
    CheckingBarcode,
    ProductFound(String),
    DetailsUnavailable,
    ProductNotFound,
    /// Application-level error payload, shown verbatim.
    BackendError(String),
    /// Non-2xx response; carries the HTTP reason phrase.
    HttpFailure(String),
    /// Network failure or unreadable body during lookup.
    LookupFailed,
    /// Network failure or unreadable body during an action.
    ActionFailed(ProductAction),
    ActionCompleted(String),
    /// Local input problem (bad quantity, no product selected).
    InvalidInput(String),
}

impl Status {
    /// True for statuses that report a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::CameraUnavailable
                | Status::ScannerInitFailed
                | Status::BackendError(_)
                | Status::HttpFailure(_)
                | Status::LookupFailed
                | Status::ActionFailed(_)
                | Status::InvalidInput(_)
        )
    }
}

impl From<&LookupOutcome> for Status {
    fn from(outcome: &LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found { product_name } => Status::ProductFound(product_name.clone()),
            LookupOutcome::DetailsUnavailable => Status::DetailsUnavailable,
            LookupOutcome::NotFound => Status::ProductNotFound,
            LookupOutcome::Rejected { message } => Status::BackendError(message.clone()),
        }
    }
}

impl From<&ActionOutcome> for Status {
    fn from(outcome: &ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Completed { message } => Status::ActionCompleted(message.clone()),
            ActionOutcome::Rejected { message } => Status::BackendError(message.clone()),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::CameraUnavailable => {
                write!(f, "Failed to access the camera. Please check permissions.")
            }
            Status::InitializingScanner => write!(f, "Initializing scanner..."),
            Status::ScannerInitFailed => write!(f, "Failed to initialize scanner."),
            Status::Scanning => write!(f, "Scanning for barcodes..."),
            Status::ScanStopped => write!(f, "Scanning stopped."),
            Status::BarcodeDetected(code) => write!(f, "Barcode detected: {}", code),
            Status::CheckingBarcode => write!(f, "Checking barcode in Grocy..."),
            Status::ProductFound(name) => {
                write!(f, "Product found: {}. What would you like to do?", name)
            }
            Status::DetailsUnavailable => write!(
                f,
                "Product found, but its details are unavailable. What would you like to do?"
            ),
            Status::ProductNotFound => {
                write!(f, "Product not found in Grocy. Would you like to add it?")
            }
            Status::BackendError(message) => write!(f, "Error: {}", message),
            Status::HttpFailure(reason) => write!(f, "Error: {}. Please try again.", reason),
            Status::LookupFailed => write!(f, "Error checking barcode. Please try again."),
            Status::ActionFailed(action) => {
                write!(f, "Error performing {}. Please try again.", action)
            }
            Status::ActionCompleted(message) => write!(f, "{}", message),
            Status::InvalidInput(message) => write!(f, "Error: {}", message),
        }
    }
}
