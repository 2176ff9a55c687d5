//! # Client Error Types
//!
//! Error types for configuration and backend calls.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  HttpStatus     │  │  DecodeFailed           │ │
//! │  │  InvalidUrl     │  │  Network        │  │                         │ │
//! │  │  ConfigLoad/Save│  │  Timeout        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Application-level `{status:"error"}` payloads are NOT errors here:    │
//! │  they decode successfully into LookupResponse / ActionResponse.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong before a backend payload is in hand.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Base URL could not be parsed or has the wrong scheme.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Backend answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Connection refused, DNS failure, reset, ...
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Response body was not the JSON we expected.
    #[error("Failed to decode response: {0}")]
    DecodeFailed(String),

    /// Client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if let Some(status) = err.status() {
            ClientError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        } else if err.is_decode() {
            ClientError::DecodeFailed(err.to_string())
        } else if err.is_builder() {
            ClientError::ClientSetup(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DecodeFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the same request may succeed when sent again.
    ///
    /// Only failures where the backend never produced an answer qualify.
    /// A non-2xx status is an answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout)
    }

    /// Returns true for failures of the call itself rather than of setup.
    ///
    /// For a lookup these unmark the barcode so it can be rescanned.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::HttpStatus { .. }
                | ClientError::Network(_)
                | ClientError::Timeout
                | ClientError::DecodeFailed(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// HTTP reason phrase, if this is a status error.
    pub fn http_reason(&self) -> Option<&str> {
        match self {
            ClientError::HttpStatus { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Network("connection refused".into()).is_retryable());
        assert!(ClientError::Timeout.is_retryable());

        assert!(!ClientError::HttpStatus {
            status: 502,
            reason: "Bad Gateway".into()
        }
        .is_retryable());
        assert!(!ClientError::DecodeFailed("eof".into()).is_retryable());
        assert!(!ClientError::InvalidConfig("bad".into()).is_retryable());
    }

    #[test]
    fn test_transport_errors() {
        assert!(ClientError::HttpStatus {
            status: 500,
            reason: "Internal Server Error".into()
        }
        .is_transport());
        assert!(ClientError::DecodeFailed("x".into()).is_transport());
        assert!(!ClientError::InvalidUrl("x".into()).is_transport());
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::HttpStatus {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(err.http_reason(), Some("Not Found"));
    }
}
