//! # Health Command
//!
//! Probes `{basePath}/health`. Run on its own as `pantry-scan health`, and
//! at the start of every scan session where a failure is only logged.

use pantry_client::InventoryApi;
use tracing::{info, warn};

/// Result of one health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    Healthy,
    /// Backend answered with a status other than "healthy".
    Degraded(String),
    /// Backend could not be reached or answered non-2xx.
    Unreachable(String),
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Health::Healthy)
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Health::Healthy => write!(f, "Backend is healthy."),
            Health::Degraded(status) => write!(f, "Backend reports status '{}'.", status),
            Health::Unreachable(reason) => write!(f, "Backend unreachable: {}", reason),
        }
    }
}

/// Probes the backend once and logs the outcome.
pub async fn check(api: &dyn InventoryApi) -> Health {
    let health = match api.health().await {
        Ok(response) if response.is_healthy() => Health::Healthy,
        Ok(response) => Health::Degraded(response.status),
        Err(e) => Health::Unreachable(e.to_string()),
    };

    if health.is_healthy() {
        info!("Backend health check passed");
    } else {
        warn!(%health, "Backend health check failed");
    }
    health
}
