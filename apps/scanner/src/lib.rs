//! # pantry-scanner
//!
//! The `pantry-scan` binary: scan a barcode, look it up in Grocy, then
//! purchase, consume or open the product.
//!
//! ## Module Organization
//! ```text
//! pantry_scanner/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap command line
//! ├── controller.rs   ◄─── ScanSessionController (scan → lookup → action)
//! ├── camera.rs       ◄─── Camera trait, MediaStream, DeviceCamera
//! ├── decoder.rs      ◄─── Decoder trait, Subscription, LineDecoder
//! ├── console.rs      ◄─── Console command parsing, stdin reader
//! ├── view.rs         ◄─── StatusView trait, TerminalView
//! ├── feedback.rs     ◄─── Beeper trait
//! ├── commands/
//! │   ├── scan.rs     ◄─── Interactive session wiring
//! │   ├── lookup.rs   ◄─── One-shot lookup
//! │   ├── action.rs   ◄─── One-shot purchase / consume / open
//! │   ├── health.rs   ◄─── Backend health probe
//! │   └── config.rs   ◄─── config show / init
//! └── error.rs        ◄─── CameraError, DecoderError, AppError
//! ```

pub mod camera;
pub mod cli;
pub mod commands;
pub mod console;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod feedback;
pub mod view;

use std::process::ExitCode;

use anyhow::Context;
use pantry_client::{HttpInventoryApi, ScannerConfig};
use pantry_core::Status;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command, ConfigCommand};
pub use controller::{Collaborators, ScanSessionController, SessionOptions};
pub use error::{AppError, AppResult, CameraError, DecoderError};

/// Log filter when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,pantry=debug,reqwest=warn";

/// Runs the selected command.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse Command Line (main) ────────────────────────────────────────► │
/// │                                                                         │
/// │  2. Initialize Logging (main) ────────────────────────────────────────► │
/// │     • --log-level, else RUST_LOG, else DEFAULT_LOG_FILTER               │
/// │     • written to stderr; stdout belongs to the status view              │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → config.toml → PANTRY_SCAN_* → flags, then validate     │
/// │     • skipped for `config init`                                         │
/// │                                                                         │
/// │  4. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • scan (default): interactive session                               │
/// │     • lookup / action / health: one call, one status line               │
/// │     • config show / init                                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// One-shot commands exit non-zero when their status is an error.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    info!(version = env!("CARGO_PKG_VERSION"), "pantry-scan");
    let command = cli.command.clone().unwrap_or(Command::Scan);

    match command {
        Command::Scan => {
            let config = load_config(&cli)?;
            commands::scan::run(&config)
                .await
                .context("scan session failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Lookup { barcode } => {
            let api = build_api(&cli)?;
            Ok(report(commands::lookup::run(&api, &barcode).await))
        }
        Command::Action {
            action,
            barcode,
            quantity,
        } => {
            let api = build_api(&cli)?;
            let status = commands::action::run(&api, action, &barcode, quantity.as_deref()).await;
            Ok(report(status))
        }
        Command::Health => {
            let api = build_api(&cli)?;
            let health = commands::health::check(&api).await;
            println!("{}", health);
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            let config = load_config(&cli)?;
            print!("{}", commands::config::show(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config {
            command: ConfigCommand::Init { force },
        } => {
            let path = commands::config::init(cli.config.clone(), force)?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `--log-level debug` - Show debug messages
/// - `RUST_LOG=pantry=trace` - Show trace for pantry crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing(level: Option<&str>) {
    let (filter, rejected) = match level.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, None),
        Some(Err(e)) => (default_filter(), Some(e)),
        None => (default_filter(), None),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = rejected {
        warn!(error = %e, "Invalid --log-level; using default filter");
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Loads the configuration and applies command-line overrides.
fn load_config(cli: &Cli) -> AppResult<ScannerConfig> {
    let mut config = ScannerConfig::load(cli.config.clone())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn build_api(cli: &Cli) -> AppResult<HttpInventoryApi> {
    let config = load_config(cli)?;
    Ok(HttpInventoryApi::from_config(&config)?)
}

/// Prints a one-shot status and maps it to an exit code.
fn report(status: Status) -> ExitCode {
    println!("{}", status);
    if status.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
