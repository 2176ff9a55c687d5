//! # Scan Session Controller
//!
//! Owns one scanning session: the camera stream, the decoder subscription,
//! the handled-set, and the product currently offered for actions.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ScanSessionController::run                          │
//! │                                                                         │
//! │   console command ──┐                                                   │
//! │                     ├──► select! ──► one event at a time               │
//! │   decoder detection ┘                                                   │
//! │                                                                         │
//! │   start_scanning()          on_barcode_detected(code)                   │
//! │   ────────────────          ──────────────────────────                  │
//! │   clear handled-set         handled? ──yes──► drop                      │
//! │   "Initializing..."             │no                                     │
//! │   decoder.start(stream)         ▼                                       │
//! │   "Scanning for barcodes..."  mark, beep, drop subscription             │
//! │                               "Barcode detected: {code}"                │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                             lookup_barcode(code) ──► InventoryApi       │
//! │                               found / details unavailable ─► actions on │
//! │                               not found / error ───────────► actions off│
//! │                               transport failure ──► unmark code         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lookup is awaited inline, so while it runs no other detection can be
//! processed and at most one request is in flight.

use std::sync::Arc;
use std::time::Instant;

use pantry_client::{ClientError, InventoryApi, ScannerConfig};
use pantry_core::{
    ActionOutcome, ActionRequest, Detection, FacingMode, LookupOutcome, ProductAction, ScanState,
    Status, Symbology,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::camera::{Camera, MediaStream};
use crate::console::ConsoleCommand;
use crate::decoder::{Decoder, Subscription};
use crate::feedback::Beeper;
use crate::view::StatusView;

// =============================================================================
// Construction
// =============================================================================

/// The external pieces a controller drives.
pub struct Collaborators {
    pub camera: Box<dyn Camera>,
    pub decoder: Box<dyn Decoder>,
    pub api: Arc<dyn InventoryApi>,
    pub beeper: Box<dyn Beeper>,
    pub view: Box<dyn StatusView>,
}

/// Per-session scanner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub facing_mode: FacingMode,
    pub symbologies: Vec<Symbology>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            facing_mode: FacingMode::Environment,
            symbologies: Symbology::DEFAULTS.to_vec(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &ScannerConfig) -> Self {
        SessionOptions {
            facing_mode: config.scanner.facing_mode,
            symbologies: config.scanner.symbologies.clone(),
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

pub struct ScanSessionController {
    camera: Box<dyn Camera>,
    decoder: Box<dyn Decoder>,
    api: Arc<dyn InventoryApi>,
    beeper: Box<dyn Beeper>,
    view: Box<dyn StatusView>,
    options: SessionOptions,

    state: ScanState,
    stream: Option<MediaStream>,
    subscription: Option<Subscription>,
    console_feed: Option<broadcast::Sender<String>>,

    /// Barcode the action controls act on; set only while they are visible.
    current_barcode: Option<String>,
    quantity_input: String,
}

impl ScanSessionController {
    pub fn new(parts: Collaborators, options: SessionOptions) -> Self {
        ScanSessionController {
            camera: parts.camera,
            decoder: parts.decoder,
            api: parts.api,
            beeper: parts.beeper,
            view: parts.view,
            options,
            state: ScanState::new(),
            stream: None,
            subscription: None,
            console_feed: None,
            current_barcode: None,
            quantity_input: String::new(),
        }
    }

    /// Routes console frames into `feed`, the console camera's source.
    pub fn with_console_feed(mut self, feed: broadcast::Sender<String>) -> Self {
        self.console_feed = Some(feed);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn current_barcode(&self) -> Option<&str> {
        self.current_barcode.as_deref()
    }

    pub fn quantity_input(&self) -> &str {
        &self.quantity_input
    }

    pub fn has_stream(&self) -> bool {
        self.stream.as_ref().is_some_and(MediaStream::is_active)
    }

    /// True while a decoder subscription is held.
    pub fn is_decoding(&self) -> bool {
        self.subscription.is_some()
    }

    // =========================================================================
    // Camera
    // =========================================================================

    /// Acquires the camera stream for this session.
    ///
    /// On failure scanning stays unavailable: a later `start_scanning`
    /// reports that the scanner could not be initialized.
    pub async fn start_camera(&mut self) -> bool {
        if self.has_stream() {
            return true;
        }

        match self.camera.acquire(self.options.facing_mode).await {
            Ok(stream) => {
                info!(stream = %stream.id(), label = %stream.label(), "Camera stream acquired");
                self.stream = Some(stream);
                true
            }
            Err(e) => {
                error!(error = %e, "Camera acquisition failed");
                self.show(Status::CameraUnavailable);
                false
            }
        }
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Starts a scanning session. Does nothing if one is already running.
    pub fn start_scanning(&mut self) {
        if !self.state.begin_session() {
            debug!("Already scanning");
            return;
        }

        self.current_barcode = None;
        self.view.set_actions_visible(false);
        self.show(Status::InitializingScanner);

        match self
            .decoder
            .start(self.stream.as_ref(), &self.options.symbologies)
        {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                info!(session = ?self.state.session_id(), "Scanning session started");
                self.show(Status::Scanning);
            }
            Err(e) => {
                warn!(error = %e, "Decoder initialization failed");
                self.state.abort_session();
                self.show(Status::ScannerInitFailed);
            }
        }
    }

    /// Stops an active scan without a detection.
    pub fn stop_scanning(&mut self) {
        if !self.state.is_scanning() {
            return;
        }

        self.subscription = None;
        self.state.stop();
        self.show(Status::ScanStopped);
    }

    /// Handles one decoded barcode.
    ///
    /// Codes already handled this session are dropped. A fresh code stops
    /// the decoder and is looked up.
    pub async fn on_barcode_detected(&mut self, code: &str) {
        if self.state.register_detection(code) == Detection::Duplicate {
            debug!(barcode = %code, "Duplicate detection ignored");
            return;
        }

        self.beeper.beep();
        self.subscription = None;
        info!(
            barcode = %code,
            session = ?self.state.session_id(),
            scan_ms = ?self.state.elapsed_ms(),
            "Barcode detected"
        );
        self.show(Status::BarcodeDetected(code.to_string()));

        self.lookup_barcode(code).await;
    }

    // =========================================================================
    // Backend
    // =========================================================================

    /// Looks `code` up and renders the outcome.
    pub async fn lookup_barcode(&mut self, code: &str) {
        self.show(Status::CheckingBarcode);
        self.current_barcode = None;
        self.view.set_actions_visible(false);

        let start = Instant::now();
        let status = match self.api.check_barcode(code).await {
            Ok(response) => {
                let outcome = LookupOutcome::from(response);
                info!(
                    barcode = %code,
                    ?outcome,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Lookup complete"
                );
                if outcome.offers_actions() {
                    self.current_barcode = Some(code.to_string());
                }
                Status::from(&outcome)
            }
            Err(e) => {
                if e.is_transport() {
                    self.state.release(code);
                }
                warn!(barcode = %code, error = %e, "Lookup failed");
                lookup_error_status(&e)
            }
        };

        self.state.complete_response();
        self.show(status);
        self.view.set_actions_visible(self.current_barcode.is_some());
    }

    /// Posts `action` for `barcode` with the current quantity input.
    pub async fn perform_action(&mut self, action: ProductAction, barcode: &str) {
        let request = match ActionRequest::new(action, barcode, &self.quantity_input) {
            Ok(request) => request,
            Err(e) => {
                debug!(%action, error = %e, "Action rejected locally");
                self.show(Status::InvalidInput(e.user_message()));
                return;
            }
        };

        let status = match self.api.perform(&request).await {
            Ok(response) => {
                let outcome = ActionOutcome::from(response);
                info!(%action, barcode = %request.barcode, completed = outcome.is_completed(), "Action finished");
                Status::from(&outcome)
            }
            Err(e) => {
                warn!(%action, barcode = %request.barcode, error = %e, "Action failed");
                action_error_status(action, &e)
            }
        };

        self.show(status);
    }

    /// Sets the quantity input. Blank means 1.
    pub fn set_quantity(&mut self, input: &str) {
        debug!(quantity = %input, "Quantity input changed");
        self.quantity_input = input.trim().to_string();
    }

    // =========================================================================
    // Event Loop
    // =========================================================================

    /// Processes console commands and detections until `quit`.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<ConsoleCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command).await {
                            break;
                        }
                    }
                    None => break,
                },
                detection = self.next_detection() => match detection {
                    Some(code) => self.on_barcode_detected(&code).await,
                    None => self.on_decoder_ended(),
                },
            }
        }

        self.shutdown();
    }

    /// Applies one console command. Returns `false` on quit.
    pub async fn handle_command(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Scan => self.start_scanning(),
            ConsoleCommand::Stop => self.stop_scanning(),
            ConsoleCommand::Action(action) => match self.current_barcode.clone() {
                Some(barcode) => self.perform_action(action, &barcode).await,
                None => self.show(Status::InvalidInput("scan a product first".into())),
            },
            ConsoleCommand::Quantity(input) => self.set_quantity(&input),
            ConsoleCommand::Help => self.view.show_help(),
            ConsoleCommand::Quit => return false,
            ConsoleCommand::Frame(line) => self.push_frame(line),
        }
        true
    }

    /// Releases the decoder and the camera stream.
    pub fn shutdown(&mut self) {
        self.subscription = None;
        self.state.stop();
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        info!(
            session = ?self.state.session_id(),
            elapsed_ms = ?self.state.elapsed_ms(),
            "Scan session closed"
        );
    }

    async fn next_detection(&mut self) -> Option<String> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => std::future::pending().await,
        }
    }

    fn on_decoder_ended(&mut self) {
        warn!("Decoder ended; frame source closed");
        self.subscription = None;
        if self.state.is_scanning() {
            self.state.stop();
            self.show(Status::ScanStopped);
        }
    }

    fn push_frame(&mut self, line: String) {
        if self.console_feed.is_none() {
            self.show(Status::InvalidInput(format!(
                "unknown command '{}'. Type 'help' for commands",
                line
            )));
            return;
        }

        if !self.state.is_scanning() {
            self.show(Status::InvalidInput(
                "not scanning. Type 'scan' to start".into(),
            ));
            return;
        }

        if let Some(feed) = &self.console_feed {
            if feed.send(line).is_err() {
                debug!("No decoder listening for console frames");
            }
        }
    }

    fn show(&mut self, status: Status) {
        debug!(status = %status, "Status");
        self.view.show_status(&status);
    }
}

// =============================================================================
// Error Rendering
// =============================================================================

/// Status for a failed lookup call.
pub fn lookup_error_status(err: &ClientError) -> Status {
    match err.http_reason() {
        Some(reason) => Status::HttpFailure(reason.to_string()),
        None => Status::LookupFailed,
    }
}

/// Status for a failed action call.
pub fn action_error_status(action: ProductAction, err: &ClientError) -> Status {
    match err.http_reason() {
        Some(reason) => Status::HttpFailure(reason.to_string()),
        None => Status::ActionFailed(action),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
