//! Canned `InventoryApi` for command tests.

use std::sync::Mutex;

use async_trait::async_trait;
use pantry_client::{ClientResult, InventoryApi};
use pantry_core::{ActionRequest, ActionResponse, HealthResponse, LookupResponse};

/// Answers each kind of call once with a fixed reply.
#[derive(Default)]
pub struct StaticApi {
    lookup: Mutex<Option<ClientResult<LookupResponse>>>,
    action: Mutex<Option<ClientResult<ActionResponse>>>,
    health: Mutex<Option<ClientResult<HealthResponse>>>,
    lookups: Mutex<Vec<String>>,
    actions: Mutex<Vec<ActionRequest>>,
}

impl StaticApi {
    pub fn lookup(reply: ClientResult<LookupResponse>) -> Self {
        StaticApi {
            lookup: Mutex::new(Some(reply)),
            ..Default::default()
        }
    }

    pub fn action(reply: ClientResult<ActionResponse>) -> Self {
        StaticApi {
            action: Mutex::new(Some(reply)),
            ..Default::default()
        }
    }

    pub fn health(reply: ClientResult<HealthResponse>) -> Self {
        StaticApi {
            health: Mutex::new(Some(reply)),
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<ActionRequest> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl InventoryApi for StaticApi {
    async fn check_barcode(&self, barcode: &str) -> ClientResult<LookupResponse> {
        self.lookups.lock().unwrap().push(barcode.to_string());
        self.lookup.lock().unwrap().take().expect("unexpected lookup")
    }

    async fn perform(&self, request: &ActionRequest) -> ClientResult<ActionResponse> {
        self.actions.lock().unwrap().push(request.clone());
        self.action.lock().unwrap().take().expect("unexpected action")
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        self.health.lock().unwrap().take().expect("unexpected health check")
    }
}
