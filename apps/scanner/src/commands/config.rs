//! # Config Commands
//!
//! `pantry-scan config show` prints the effective configuration (file,
//! environment and flags merged). `pantry-scan config init` writes the
//! defaults to the config file.

use std::path::PathBuf;

use pantry_client::{ClientError, ScannerConfig};
use tracing::info;

use crate::error::AppResult;

/// Effective configuration as TOML.
pub fn show(config: &ScannerConfig) -> AppResult<String> {
    Ok(toml::to_string_pretty(config).map_err(ClientError::from)?)
}

/// Writes a default config file and returns its path.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init(path: Option<PathBuf>, force: bool) -> AppResult<PathBuf> {
    let path = path
        .or_else(ScannerConfig::default_config_path)
        .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

    if path.exists() && !force {
        return Err(ClientError::ConfigSaveFailed(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }

    let written = ScannerConfig::default().save(Some(path))?;
    info!(path = %written.display(), "Default config written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("pantry-scan-cmd-{}", uuid::Uuid::new_v4()))
            .join("config.toml")
    }

    #[test]
    fn test_show_contains_sections() {
        let text = show(&ScannerConfig::default()).unwrap();
        assert!(text.contains("[backend]"));
        assert!(text.contains("[scanner]"));
        assert!(text.contains("[lookup]"));
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let path = temp_path();

        let written = init(Some(path.clone()), false).unwrap();
        assert_eq!(written, path);

        let loaded = ScannerConfig::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.base_url(), ScannerConfig::default().base_url());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let path = temp_path();
        init(Some(path.clone()), false).unwrap();

        assert!(init(Some(path.clone()), false).is_err());
        assert!(init(Some(path.clone()), true).is_ok());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
