//! # Scan Command
//!
//! Wires the interactive session together and runs it until `quit`,
//! end of input or Ctrl-C.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Scan Session Startup                              │
//! │                                                                         │
//! │  1. Build HttpInventoryApi ───────────────────────────────────────────► │
//! │     • base URL, timeouts, lookup retry from ScannerConfig               │
//! │                                                                         │
//! │  2. Probe {basePath}/health ──────────────────────────────────────────► │
//! │     • logged only; a down backend does not stop the session             │
//! │                                                                         │
//! │  3. Pick the frame source ────────────────────────────────────────────► │
//! │     • device "-": console lines are frames                              │
//! │     • otherwise: the device file, one scan per line                     │
//! │                                                                         │
//! │  4. Start console input + Ctrl-C handler ─────────────────────────────► │
//! │                                                                         │
//! │  5. Acquire camera, start scanning, run the event loop ───────────────► │
//! │     • stream released when the loop ends                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use pantry_client::{HttpInventoryApi, InventoryApi, ScannerConfig};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use crate::camera::{DeviceCamera, FRAME_BUFFER};
use crate::commands::health;
use crate::console::{spawn_ctrl_c, spawn_stdin_reader, ConsoleCommand};
use crate::controller::{Collaborators, ScanSessionController, SessionOptions};
use crate::decoder::LineDecoder;
use crate::error::AppResult;
use crate::feedback::beeper_for;
use crate::view::TerminalView;

/// Console commands buffered ahead of the controller.
const COMMAND_BUFFER: usize = 32;

/// Runs the interactive scan session.
pub async fn run(config: &ScannerConfig) -> AppResult<()> {
    let api: Arc<dyn InventoryApi> = Arc::new(HttpInventoryApi::from_config(config)?);
    info!(base_url = %config.base_url(), "Scanner starting");

    health::check(api.as_ref()).await;

    let (camera, console_feed) = match config.scanner.device_path() {
        None => {
            let (feed, _) = broadcast::channel(FRAME_BUFFER);
            (DeviceCamera::console(feed.clone()), Some(feed))
        }
        Some(path) => (DeviceCamera::device(path), None),
    };

    let mut controller = ScanSessionController::new(
        Collaborators {
            camera: Box::new(camera),
            decoder: Box::new(LineDecoder::new()),
            api,
            beeper: beeper_for(config.scanner.beep),
            view: Box::new(TerminalView::stdout()),
        },
        SessionOptions::from_config(config),
    );
    if let Some(feed) = console_feed {
        controller = controller.with_console_feed(feed);
    }

    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    spawn_stdin_reader(commands_tx.clone())?;
    spawn_ctrl_c(commands_tx);

    controller.handle_command(ConsoleCommand::Help).await;
    if controller.start_camera().await {
        controller.start_scanning();
    }

    controller.run(commands_rx).await;
    Ok(())
}
