//! # Lookup Command
//!
//! `pantry-scan lookup <BARCODE>`: one check-barcode call, rendered as the
//! status line a scan would produce.

use pantry_client::InventoryApi;
use pantry_core::validation::validate_barcode;
use pantry_core::{CoreError, LookupOutcome, Status};
use tracing::{info, warn};

use crate::controller::lookup_error_status;

/// Looks `barcode` up and returns the status to print.
pub async fn run(api: &dyn InventoryApi, barcode: &str) -> Status {
    let barcode = match validate_barcode(barcode) {
        Ok(barcode) => barcode,
        Err(e) => return Status::InvalidInput(CoreError::from(e).user_message()),
    };

    match api.check_barcode(&barcode).await {
        Ok(response) => {
            let outcome = LookupOutcome::from(response);
            info!(barcode = %barcode, ?outcome, "Lookup complete");
            Status::from(&outcome)
        }
        Err(e) => {
            warn!(barcode = %barcode, error = %e, "Lookup failed");
            lookup_error_status(&e)
        }
    }
}
