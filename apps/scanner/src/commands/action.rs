//! # Action Command
//!
//! `pantry-scan action <purchase|consume|open> <BARCODE> [--quantity N]`.

use pantry_client::InventoryApi;
use pantry_core::{ActionOutcome, ActionRequest, ProductAction, Status};
use tracing::{info, warn};

use crate::controller::action_error_status;

/// Posts one action and returns the status to print.
pub async fn run(
    api: &dyn InventoryApi,
    action: ProductAction,
    barcode: &str,
    quantity: Option<&str>,
) -> Status {
    let request = match ActionRequest::new(action, barcode, quantity.unwrap_or_default()) {
        Ok(request) => request,
        Err(e) => return Status::InvalidInput(e.user_message()),
    };

    match api.perform(&request).await {
        Ok(response) => {
            let outcome = ActionOutcome::from(response);
            info!(%action, barcode = %request.barcode, completed = outcome.is_completed(), "Action finished");
            Status::from(&outcome)
        }
        Err(e) => {
            warn!(%action, barcode = %request.barcode, error = %e, "Action failed");
            action_error_status(action, &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::StaticApi;
    use pantry_client::ClientError;
    use pantry_core::ActionResponse;

    #[tokio::test]
    async fn test_purchase_with_quantity() {
        let api = StaticApi::action(Ok(ActionResponse::Success {
            message: Some("Purchased 2 x Oat Milk".into()),
        }));

        let status = run(&api, ProductAction::Purchase, "123", Some("2")).await;

        assert_eq!(status.to_string(), "Purchased 2 x Oat Milk");
        let sent = api.actions();
        assert_eq!(sent[0].quantity.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_open_ignores_quantity() {
        let api = StaticApi::action(Ok(ActionResponse::Success { message: None }));

        run(&api, ProductAction::Open, "123", Some("4")).await;

        assert_eq!(api.actions()[0].quantity, None);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_locally() {
        let api = StaticApi::action(Ok(ActionResponse::Success { message: None }));

        let status = run(&api, ProductAction::Consume, "123", Some("0")).await;

        assert_eq!(status.to_string(), "Error: quantity must be a positive number");
        assert!(api.actions().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_shows_reason() {
        let api = StaticApi::action(Err(ClientError::HttpStatus {
            status: 500,
            reason: "Internal Server Error".into(),
        }));

        let status = run(&api, ProductAction::Consume, "123", None).await;

        assert_eq!(
            status.to_string(),
            "Error: Internal Server Error. Please try again."
        );
    }
}
