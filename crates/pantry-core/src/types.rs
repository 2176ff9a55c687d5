//! # Domain Types
//!
//! Wire and domain types for the scan-to-action flow.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Symbology     │   │  ProductAction  │   │  ActionRequest  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Code128        │   │  Purchase       │   │  barcode        │       │
//! │  │  Ean13 / Ean8   │   │  Consume        │   │  quantity?      │       │
//! │  │  UpcA           │   │  Open           │   │  (none for open)│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Wire (backend JSON, tagged on "status")   Domain (what the UI shows)  │
//! │  ┌─────────────────┐                        ┌─────────────────────┐    │
//! │  │ LookupResponse  │ ─────── From ────────► │   LookupOutcome     │    │
//! │  │ ActionResponse  │ ─────── From ────────► │   ActionOutcome     │    │
//! │  └─────────────────┘                        └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::validation::{validate_barcode, validate_quantity_input};

// =============================================================================
// Symbology
// =============================================================================

/// Barcode symbologies the decoder can be asked to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// Code 128: any printable ASCII.
    #[serde(rename = "code_128")]
    Code128,
    /// EAN-13: 13 digits with check digit.
    #[serde(rename = "ean_13")]
    Ean13,
    /// EAN-8: 8 digits with check digit.
    #[serde(rename = "ean_8")]
    Ean8,
    /// UPC-A: 12 digits with check digit.
    #[serde(rename = "upc_a")]
    UpcA,
}

impl Symbology {
    /// The symbologies enabled when nothing is configured.
    pub const DEFAULTS: [Symbology; 3] = [Symbology::Code128, Symbology::Ean13, Symbology::Ean8];

    /// Returns true if `code` is a well-formed value of this symbology.
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            Symbology::Code128 => {
                !code.is_empty()
                    && code.len() <= crate::MAX_BARCODE_LEN
                    && code.bytes().all(|b| (0x20..=0x7e).contains(&b))
            }
            Symbology::Ean13 => is_gtin(code, 13),
            Symbology::Ean8 => is_gtin(code, 8),
            Symbology::UpcA => is_gtin(code, 12),
        }
    }

    /// Returns the first symbology in `enabled` that accepts `code`.
    pub fn detect(code: &str, enabled: &[Symbology]) -> Option<Symbology> {
        enabled.iter().copied().find(|s| s.accepts(code))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Code128 => "code_128",
            Symbology::Ean13 => "ean_13",
            Symbology::Ean8 => "ean_8",
            Symbology::UpcA => "upc_a",
        }
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Symbology {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "code_128" | "code128" => Ok(Symbology::Code128),
            "ean_13" | "ean13" | "ean" => Ok(Symbology::Ean13),
            "ean_8" | "ean8" => Ok(Symbology::Ean8),
            "upc_a" | "upca" | "upc" => Ok(Symbology::UpcA),
            other => Err(CoreError::UnknownSymbology(other.to_string())),
        }
    }
}

/// Fixed-length numeric code whose last digit is the GS1 mod-10 check digit.
fn is_gtin(code: &str, len: usize) -> bool {
    if code.len() != len || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let (data, check) = digits.split_at(len - 1);

    // Weights alternate 3,1,3,... starting from the digit next to the check digit
    let sum: u32 = data
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();

    (10 - sum % 10) % 10 == check[0]
}

// =============================================================================
// Facing Mode
// =============================================================================

/// Which camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear-facing camera.
    #[default]
    Environment,
    /// Front-facing camera.
    User,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for FacingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "environment" | "rear" | "back" => Ok(FacingMode::Environment),
            "user" | "front" => Ok(FacingMode::User),
            other => Err(CoreError::UnknownFacingMode(other.to_string())),
        }
    }
}

// =============================================================================
// Product Action
// =============================================================================

/// Follow-up action offered once a product has been found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAction {
    Purchase,
    Consume,
    Open,
}

impl ProductAction {
    /// Path of the mutation endpoint, relative to the base path.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ProductAction::Purchase => "api/purchase-product",
            ProductAction::Consume => "api/consume-product",
            ProductAction::Open => "api/open-product",
        }
    }

    /// Opening a product never carries a quantity.
    pub fn takes_quantity(&self) -> bool {
        !matches!(self, ProductAction::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductAction::Purchase => "purchase",
            ProductAction::Consume => "consume",
            ProductAction::Open => "open",
        }
    }
}

impl std::fmt::Display for ProductAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "purchase" | "buy" => Ok(ProductAction::Purchase),
            "consume" | "use" => Ok(ProductAction::Consume),
            "open" => Ok(ProductAction::Open),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of the check-barcode call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRequest {
    pub barcode: String,
}

impl BarcodeRequest {
    pub fn new(barcode: impl Into<String>) -> Self {
        BarcodeRequest {
            barcode: barcode.into(),
        }
    }
}

/// A purchase / consume / open request, built fresh for every action.
///
/// The quantity is the user's input text, passed through as-is once it has
/// been checked to be a positive number. It is absent for `open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    #[serde(skip)]
    pub action: ProductAction,

    pub barcode: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl ActionRequest {
    /// Builds a request from the raw quantity input.
    ///
    /// A blank input means a quantity of `"1"`.
    pub fn new(action: ProductAction, barcode: &str, quantity_input: &str) -> CoreResult<Self> {
        let barcode = validate_barcode(barcode)?;

        let quantity = if action.takes_quantity() {
            Some(validate_quantity_input(quantity_input)?)
        } else {
            None
        };

        Ok(ActionRequest {
            action,
            barcode,
            quantity,
        })
    }

    /// Endpoint this request is posted to.
    pub fn endpoint(&self) -> &'static str {
        self.action.endpoint()
    }
}

// =============================================================================
// Lookup Response (wire)
// =============================================================================

/// Raw check-barcode response, discriminated by `status`.
///
/// `product` is kept as loose JSON so a malformed product object never fails
/// the whole decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResponse {
    Success {
        #[serde(default)]
        product: Option<Value>,
    },
    NotFound,
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Lookup Outcome (domain)
// =============================================================================

/// What a lookup means for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Product resolved with a display name.
    Found { product_name: String },
    /// Backend says success but the product has no usable name.
    DetailsUnavailable,
    /// Barcode is unknown to the backend.
    NotFound,
    /// Backend answered with an application-level error.
    Rejected { message: String },
}

impl LookupOutcome {
    /// Whether purchase / consume / open should be offered.
    pub fn offers_actions(&self) -> bool {
        matches!(
            self,
            LookupOutcome::Found { .. } | LookupOutcome::DetailsUnavailable
        )
    }
}

impl From<LookupResponse> for LookupOutcome {
    fn from(response: LookupResponse) -> Self {
        match response {
            LookupResponse::Success { product } => {
                let name = product
                    .as_ref()
                    .and_then(|p| p.get("product_name"))
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty());

                match name {
                    Some(n) => LookupOutcome::Found {
                        product_name: n.to_string(),
                    },
                    None => LookupOutcome::DetailsUnavailable,
                }
            }
            LookupResponse::NotFound => LookupOutcome::NotFound,
            LookupResponse::Error { message } => LookupOutcome::Rejected {
                message: message.unwrap_or_else(|| crate::UNKNOWN_ERROR.to_string()),
            },
            LookupResponse::Unknown => LookupOutcome::Rejected {
                message: crate::UNEXPECTED_RESPONSE.to_string(),
            },
        }
    }
}

// =============================================================================
// Action Response
// =============================================================================

/// Raw response of a mutation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResponse {
    Success {
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Result of a mutation as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed { message: String },
    Rejected { message: String },
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed { .. })
    }
}

impl From<ActionResponse> for ActionOutcome {
    fn from(response: ActionResponse) -> Self {
        match response {
            ActionResponse::Success { message } => ActionOutcome::Completed {
                message: message.unwrap_or_else(|| "Done.".to_string()),
            },
            ActionResponse::Error { message } => ActionOutcome::Rejected {
                message: message.unwrap_or_else(|| crate::UNKNOWN_ERROR.to_string()),
            },
            ActionResponse::Unknown => ActionOutcome::Rejected {
                message: crate::UNEXPECTED_RESPONSE.to_string(),
            },
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Body of the backend's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gtin_check_digits() {
        assert!(Symbology::Ean13.accepts("4006381333931"));
        assert!(!Symbology::Ean13.accepts("4006381333932"));
        assert!(Symbology::Ean8.accepts("96385074"));
        assert!(Symbology::UpcA.accepts("036000291452"));
        assert!(!Symbology::UpcA.accepts("03600029145"));
        assert!(!Symbology::Ean8.accepts("9638507A"));
    }

    #[test]
    fn test_code128_accepts_printable_ascii() {
        assert!(Symbology::Code128.accepts("ABC-123 x"));
        assert!(!Symbology::Code128.accepts(""));
        assert!(!Symbology::Code128.accepts("tab\there"));
        assert!(!Symbology::Code128.accepts("café"));
    }

    #[test]
    fn test_detect_respects_enabled_set() {
        assert_eq!(
            Symbology::detect("4006381333931", &[Symbology::Ean13]),
            Some(Symbology::Ean13)
        );
        assert_eq!(Symbology::detect("ABC", &[Symbology::Ean13, Symbology::Ean8]), None);
        assert_eq!(
            Symbology::detect("ABC", &Symbology::DEFAULTS),
            Some(Symbology::Code128)
        );
    }

    #[test]
    fn test_symbology_parsing() {
        assert_eq!("code_128".parse::<Symbology>().unwrap(), Symbology::Code128);
        assert_eq!("EAN-13".parse::<Symbology>().unwrap(), Symbology::Ean13);
        assert_eq!("upc".parse::<Symbology>().unwrap(), Symbology::UpcA);
        assert!("qr".parse::<Symbology>().is_err());
    }

    #[test]
    fn test_open_request_has_no_quantity() {
        let req = ActionRequest::new(ProductAction::Open, "123", "5").unwrap();
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "barcode": "123" }));
        assert_eq!(req.endpoint(), "api/open-product");
    }

    #[test]
    fn test_purchase_request_passes_quantity_text() {
        let req = ActionRequest::new(ProductAction::Purchase, "123", "2").unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "barcode": "123", "quantity": "2" })
        );
    }

    #[test]
    fn test_blank_quantity_defaults_to_one() {
        let req = ActionRequest::new(ProductAction::Consume, "123", "  ").unwrap();
        assert_eq!(req.quantity.as_deref(), Some("1"));
    }

    #[test]
    fn test_invalid_quantity_is_rejected() {
        assert!(ActionRequest::new(ProductAction::Consume, "123", "-1").is_err());
        assert!(ActionRequest::new(ProductAction::Consume, "123", "abc").is_err());
        // Open ignores the quantity input entirely
        assert!(ActionRequest::new(ProductAction::Open, "123", "abc").is_ok());
    }

    #[test]
    fn test_lookup_success_with_name() {
        let resp: LookupResponse = serde_json::from_value(json!({
            "status": "success",
            "product": { "product_name": "Milk", "id": 7 }
        }))
        .unwrap();
        assert_eq!(
            LookupOutcome::from(resp),
            LookupOutcome::Found {
                product_name: "Milk".into()
            }
        );
    }

    #[test]
    fn test_lookup_success_without_name_is_details_unavailable() {
        for body in [
            json!({ "status": "success" }),
            json!({ "status": "success", "product": {} }),
            json!({ "status": "success", "product": { "product_name": 42 } }),
            json!({ "status": "success", "product": "Milk" }),
            json!({ "status": "success", "product": { "product_name": "   " } }),
        ] {
            let resp: LookupResponse = serde_json::from_value(body).unwrap();
            let outcome = LookupOutcome::from(resp);
            assert_eq!(outcome, LookupOutcome::DetailsUnavailable);
            assert!(outcome.offers_actions());
        }
    }

    #[test]
    fn test_lookup_not_found_and_error() {
        let resp: LookupResponse = serde_json::from_value(json!({ "status": "not_found" })).unwrap();
        let outcome = LookupOutcome::from(resp);
        assert_eq!(outcome, LookupOutcome::NotFound);
        assert!(!outcome.offers_actions());

        let resp: LookupResponse =
            serde_json::from_value(json!({ "status": "error", "message": "Grocy down" })).unwrap();
        assert_eq!(
            LookupOutcome::from(resp),
            LookupOutcome::Rejected {
                message: "Grocy down".into()
            }
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let resp: LookupResponse = serde_json::from_value(json!({ "status": "pending" })).unwrap();
        assert_eq!(resp, LookupResponse::Unknown);
        assert!(matches!(
            LookupOutcome::from(resp),
            LookupOutcome::Rejected { .. }
        ));
    }

    #[test]
    fn test_action_response_mapping() {
        let resp: ActionResponse =
            serde_json::from_value(json!({ "status": "success", "message": "Added 2 Milk" }))
                .unwrap();
        assert_eq!(
            ActionOutcome::from(resp),
            ActionOutcome::Completed {
                message: "Added 2 Milk".into()
            }
        );

        let resp: ActionResponse =
            serde_json::from_value(json!({ "status": "error", "message": "No stock" })).unwrap();
        assert!(!ActionOutcome::from(resp).is_completed());
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("Purchase".parse::<ProductAction>().unwrap(), ProductAction::Purchase);
        assert_eq!("use".parse::<ProductAction>().unwrap(), ProductAction::Consume);
        assert!("sell".parse::<ProductAction>().is_err());
    }
}
