//! # Command Line
//!
//! ```text
//! pantry-scan [--config PATH] [--base-url URL] [--device PATH] [--no-beep]
//!             [--log-level LEVEL] [COMMAND]
//! ```
//!
//! Without a command the interactive scan session starts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pantry_client::ScannerConfig;
use pantry_core::ProductAction;

#[derive(Debug, Parser)]
#[command(
    name = "pantry-scan",
    version,
    about = "Scan barcodes and update a Grocy pantry"
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, including any sub-path
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Scanner device path, or "-" for console input
    #[arg(long, global = true, value_name = "PATH")]
    pub device: Option<String>,

    /// Disable the scan confirmation beep
    #[arg(long, global = true)]
    pub no_beep: bool,

    /// Log filter, e.g. "debug" or "info,pantry=trace" (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Interactive scanning session (default)
    Scan,

    /// Look a barcode up once
    Lookup { barcode: String },

    /// Purchase, consume or open a product once
    Action {
        /// purchase | consume | open
        action: ProductAction,

        barcode: String,

        /// Quantity for purchase / consume (default 1)
        #[arg(long, short)]
        quantity: Option<String>,
    },

    /// Check that the backend is reachable
    Health,

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Applies command-line overrides on top of file and environment.
    pub fn apply_overrides(&self, config: &mut ScannerConfig) {
        if let Some(url) = &self.base_url {
            config.backend.base_url = url.clone();
        }
        if let Some(device) = &self.device {
            config.scanner.device = device.clone();
        }
        if self.no_beep {
            config.scanner.beep = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["pantry-scan"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.no_beep);
    }

    #[test]
    fn test_parse_action() {
        let cli = Cli::try_parse_from([
            "pantry-scan",
            "action",
            "purchase",
            "4006381333931",
            "--quantity",
            "2",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Action {
                action: ProductAction::Purchase,
                barcode: "4006381333931".into(),
                quantity: Some("2".into()),
            })
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Cli::try_parse_from(["pantry-scan", "action", "eat", "123"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pantry-scan",
            "lookup",
            "123",
            "--base-url",
            "http://pi.local/ingress/x/",
            "--no-beep",
        ])
        .unwrap();

        let mut config = ScannerConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.base_url(), "http://pi.local/ingress/x/");
        assert!(!config.scanner.beep);
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::try_parse_from(["pantry-scan", "config", "init", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Config {
                command: ConfigCommand::Init { force: true }
            })
        );
    }
}
