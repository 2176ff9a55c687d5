//! # Inventory API
//!
//! The HTTP contract with the pantry backend.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────────┬────────┬───────────────────────────┐
//! │ Endpoint                         │ Method │ Body                      │
//! ├──────────────────────────────────┼────────┼───────────────────────────┤
//! │ {basePath}/api/check-barcode     │ POST   │ {barcode}                 │
//! │ {basePath}/api/purchase-product  │ POST   │ {barcode, quantity}       │
//! │ {basePath}/api/consume-product   │ POST   │ {barcode, quantity}       │
//! │ {basePath}/api/open-product      │ POST   │ {barcode}                 │
//! │ {basePath}/health                │ GET    │ -                         │
//! └──────────────────────────────────┴────────┴───────────────────────────┘
//! ```
//!
//! A non-2xx status is a [`ClientError::HttpStatus`]. A 2xx with
//! `{status:"error"}` is a successful call carrying an application error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use pantry_core::path::endpoint_url;
use pantry_core::{ActionRequest, ActionResponse, BarcodeRequest, HealthResponse, LookupResponse};

use crate::config::ScannerConfig;
use crate::error::{ClientError, ClientResult};
use crate::retry::RetryPolicy;

// =============================================================================
// Inventory API Trait
// =============================================================================

/// Backend operations the scanner needs.
///
/// Implemented over HTTP by [`HttpInventoryApi`]; tests substitute fakes.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Looks up a barcode.
    async fn check_barcode(&self, barcode: &str) -> ClientResult<LookupResponse>;

    /// Posts a purchase / consume / open request.
    async fn perform(&self, request: &ActionRequest) -> ClientResult<ActionResponse>;

    /// Probes backend liveness.
    async fn health(&self) -> ClientResult<HealthResponse>;
}

// =============================================================================
// Endpoints
// =============================================================================

/// Absolute endpoint URLs derived from the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = url::Url::parse(base_url)?;
        Ok(Endpoints {
            base: parsed.as_str().to_string(),
        })
    }

    pub fn check_barcode(&self) -> String {
        endpoint_url(&self.base, "api/check-barcode")
    }

    pub fn action(&self, request: &ActionRequest) -> String {
        endpoint_url(&self.base, request.endpoint())
    }

    pub fn health(&self) -> String {
        endpoint_url(&self.base, "health")
    }
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`InventoryApi`] over reqwest.
pub struct HttpInventoryApi {
    client: Client,
    endpoints: Endpoints,
    lookup_retry: RetryPolicy,
}

impl HttpInventoryApi {
    /// Creates a client with explicit timeouts and no lookup retry.
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ClientError::ClientSetup(e.to_string()))?;

        Ok(HttpInventoryApi {
            client,
            endpoints: Endpoints::new(base_url)?,
            lookup_retry: RetryPolicy::none(),
        })
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &ScannerConfig) -> ClientResult<Self> {
        Ok(Self::new(
            config.base_url(),
            config.request_timeout(),
            config.connect_timeout(),
        )?
        .with_lookup_retry(config.retry_policy()))
    }

    /// Sets the retry policy for check-barcode.
    pub fn with_lookup_retry(mut self, policy: RetryPolicy) -> Self {
        self.lookup_retry = policy;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        debug!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "POST complete"
        );

        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ClientError::DecodeFailed(e.to_string()))
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn check_barcode(&self, barcode: &str) -> ClientResult<LookupResponse> {
        let url = &self.endpoints.check_barcode();
        let body = &BarcodeRequest::new(barcode);
        debug!(barcode = %barcode, "check-barcode");

        self.lookup_retry
            .run(move || self.post_json(url, body))
            .await
    }

    async fn perform(&self, request: &ActionRequest) -> ClientResult<ActionResponse> {
        let url = self.endpoints.action(request);
        info!(action = %request.action, barcode = %request.barcode, "Posting action");
        self.post_json(&url, request).await
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        let url = self.endpoints.health();
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| ClientError::DecodeFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
