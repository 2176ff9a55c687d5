//! # Scanner Configuration
//!
//! Configuration for the backend connection, the scanner devices and the
//! lookup retry policy.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the app)          │
//! │     --base-url, --device, --no-beep                                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     PANTRY_SCAN_BASE_URL=http://homeassistant:3456/                    │
//! │     PANTRY_SCAN_DEVICE=/dev/ttyACM0                                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/pantry-scan/config.toml (Linux)                          │
//! │     ~/Library/Application Support/org.pantry.pantry-scan (macOS)       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [backend]
//! base_url = "http://localhost:3456/"
//! request_timeout_secs = 10
//! connect_timeout_secs = 5
//!
//! [scanner]
//! facing_mode = "environment"
//! symbologies = ["code_128", "ean_13", "ean_8"]
//! device = "-"
//! beep = true
//!
//! [lookup]
//! max_retries = 0
//! initial_backoff_ms = 250
//! max_backoff_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use pantry_core::{FacingMode, Symbology};

use crate::error::{ClientError, ClientResult};
use crate::retry::RetryPolicy;

/// Device value meaning "read frames from the interactive console".
pub const CONSOLE_DEVICE: &str = "-";

// =============================================================================
// Backend Settings
// =============================================================================

/// Where the inventory backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL; may include a sub-path. Trailing slashes are ignored.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3456/".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Scanner Settings
// =============================================================================

/// Camera and decoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Which camera to request.
    #[serde(default)]
    pub facing_mode: FacingMode,

    /// Symbologies the decoder reports.
    #[serde(default = "default_symbologies")]
    pub symbologies: Vec<Symbology>,

    /// Frame source: `-` for the console, otherwise a device path
    /// (serial or keyboard-wedge scanner emitting one code per line).
    #[serde(default = "default_device")]
    pub device: String,

    /// Audible confirmation on detection.
    #[serde(default = "default_true")]
    pub beep: bool,
}

fn default_symbologies() -> Vec<Symbology> {
    Symbology::DEFAULTS.to_vec()
}

fn default_device() -> String {
    CONSOLE_DEVICE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            facing_mode: FacingMode::default(),
            symbologies: default_symbologies(),
            device: default_device(),
            beep: true,
        }
    }
}

impl ScannerSettings {
    /// The device path, or `None` for the console.
    pub fn device_path(&self) -> Option<PathBuf> {
        if self.device.trim() == CONSOLE_DEVICE || self.device.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(self.device.trim()))
        }
    }
}

// =============================================================================
// Lookup Settings
// =============================================================================

/// Automatic retry of the check-barcode call.
///
/// `max_retries = 0` (the default) means a single attempt; the user rescans
/// to retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupSettings {
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_initial_backoff() -> u64 {
    250
}

fn default_max_backoff() -> u64 {
    5
}

impl Default for LookupSettings {
    fn default() -> Self {
        LookupSettings {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete scanner configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub lookup: LookupSettings,
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    ///
    /// Not validated: callers layer their own overrides on top and then
    /// call [`ScannerConfig::validate`].
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scanner config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Saves configuration to file and returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Scanner config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.backend.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.backend.base_url
            )));
        }

        if self.backend.request_timeout_secs == 0 || self.backend.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.scanner.symbologies.is_empty() {
            return Err(ClientError::InvalidConfig(
                "at least one symbology must be enabled".into(),
            ));
        }

        Ok(())
    }

    /// Applies `PANTRY_SCAN_*` overrides from a variable lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("PANTRY_SCAN_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.backend.base_url = url;
        }

        if let Some(device) = var("PANTRY_SCAN_DEVICE") {
            debug!(device = %device, "Overriding device from environment");
            self.scanner.device = device;
        }

        if let Some(beep) = var("PANTRY_SCAN_BEEP") {
            match beep.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.scanner.beep = true,
                "0" | "false" | "no" | "off" => self.scanner.beep = false,
                _ => warn!(value = %beep, "Unknown PANTRY_SCAN_BEEP value"),
            }
        }

        if let Some(list) = var("PANTRY_SCAN_SYMBOLOGIES") {
            let parsed: Result<Vec<Symbology>, _> = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse)
                .collect();
            match parsed {
                Ok(symbologies) => self.scanner.symbologies = symbologies,
                Err(e) => warn!(error = %e, "Ignoring PANTRY_SCAN_SYMBOLOGIES"),
            }
        }

        if let Some(retries) = var("PANTRY_SCAN_LOOKUP_RETRIES") {
            match retries.parse::<u32>() {
                Ok(n) => self.lookup.max_retries = n,
                Err(_) => warn!(value = %retries, "Ignoring PANTRY_SCAN_LOOKUP_RETRIES"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "pantry", "pantry-scan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.backend.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.connect_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.lookup.max_retries,
            initial_backoff: Duration::from_millis(self.lookup.initial_backoff_ms),
            max_backoff: Duration::from_secs(self.lookup.max_backoff_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.base_url(), "http://localhost:3456/");
        assert_eq!(config.scanner.facing_mode, FacingMode::Environment);
        assert_eq!(config.scanner.symbologies, Symbology::DEFAULTS.to_vec());
        assert_eq!(config.lookup.max_retries, 0);
        assert!(config.scanner.device_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScannerConfig::default();

        config.backend.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.backend.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.backend.base_url = "https://example.com/ingress/abc/".into();
        assert!(config.validate().is_ok());

        config.scanner.symbologies.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PANTRY_SCAN_BASE_URL", "http://grocy.local/"),
            ("PANTRY_SCAN_DEVICE", "/dev/ttyACM0"),
            ("PANTRY_SCAN_BEEP", "off"),
            ("PANTRY_SCAN_SYMBOLOGIES", "ean_13, upc_a"),
            ("PANTRY_SCAN_LOOKUP_RETRIES", "2"),
        ]
        .into_iter()
        .collect();

        let mut config = ScannerConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url(), "http://grocy.local/");
        assert_eq!(config.scanner.device_path(), Some(PathBuf::from("/dev/ttyACM0")));
        assert!(!config.scanner.beep);
        assert_eq!(
            config.scanner.symbologies,
            vec![Symbology::Ean13, Symbology::UpcA]
        );
        assert_eq!(config.retry_policy().max_retries, 2);
    }

    #[test]
    fn test_bad_symbology_override_is_ignored() {
        let mut config = ScannerConfig::default();
        config.apply_overrides(|key| {
            (key == "PANTRY_SCAN_SYMBOLOGIES").then(|| "ean_13,qr".to_string())
        });
        assert_eq!(config.scanner.symbologies, Symbology::DEFAULTS.to_vec());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScannerConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://pantry:8080/"

            [scanner]
            symbologies = ["ean_8"]
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.scanner.symbologies, vec![Symbology::Ean8]);
        assert!(config.scanner.beep);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("pantry-scan-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut config = ScannerConfig::default();
        config.backend.base_url = "http://saved:1234/".into();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[backend]"));
        assert!(contents.contains("[scanner]"));

        let loaded: ScannerConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.base_url(), "http://saved:1234/");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_leaves_validation_to_caller() {
        let dir = std::env::temp_dir().join(format!("pantry-scan-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[backend]\nbase_url = \"grocy.local:3456\"\n").unwrap();

        let mut config = ScannerConfig::load(Some(path)).unwrap();
        assert!(config.validate().is_err());

        config.backend.base_url = "http://grocy.local:3456/".into();
        assert!(config.validate().is_ok());

        std::fs::remove_dir_all(dir).ok();
    }
}
