//! # pantry-scan Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           pantry-scan                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Terminal                                      │  │
//! │  │  stdin ──► console commands / scanned lines                      │  │
//! │  │  stdout ◄── status line, action hints                            │  │
//! │  │  stderr ◄── tracing logs                                         │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Binary (this crate)                      │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► parses flags, sets up logging                    │  │
//! │  │  lib.rs ─────► loads config, dispatches the command             │  │
//! │  │  controller ─► scan → lookup → purchase / consume / open        │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │            Inventory backend (Grocy behind an HTTP shim)         │  │
//! │  │  {basePath}/api/check-barcode, .../purchase-product, ...         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;
use pantry_scanner::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    pantry_scanner::init_tracing(cli.log_level.as_deref());

    // The actual dispatch is in lib.rs for testability
    pantry_scanner::run(cli).await
}
