//! # Barcode Decoder
//!
//! Turns camera frames into decoded barcode strings.
//!
//! A running decoder is represented by a [`Subscription`]. The controller
//! holds at most one; dropping it stops decoding and discards anything
//! still queued. The subscription also ends on its own once the stream's
//! source runs dry (a scanner device closing).
//!
//! ```text
//!   MediaStream ──frames──► decoder task ──mpsc──► Subscription::next()
//!                              │
//!                              └─ drops frames no enabled symbology accepts
//! ```

use pantry_core::Symbology;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::camera::MediaStream;
use crate::error::DecoderError;

/// Detections buffered before the decoder waits for the controller.
const DETECTION_BUFFER: usize = 16;

// =============================================================================
// Decoder Trait
// =============================================================================

/// Starts continuous decoding on a stream.
pub trait Decoder: Send {
    /// Binds to `stream` and starts decoding the enabled `symbologies`.
    ///
    /// Fails with [`DecoderError::NoStream`] when there is no active stream.
    fn start(
        &mut self,
        stream: Option<&MediaStream>,
        symbologies: &[Symbology],
    ) -> Result<Subscription, DecoderError>;
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle to a running decoder.
#[derive(Debug)]
pub struct Subscription {
    detections: mpsc::Receiver<String>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wraps a detection channel and the task feeding it, if any.
    pub fn new(detections: mpsc::Receiver<String>, task: Option<JoinHandle<()>>) -> Self {
        Subscription { detections, task }
    }

    /// Next decoded barcode. `None` once the decoder has ended.
    pub async fn next(&mut self) -> Option<String> {
        self.detections.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.detections.close();
    }
}

// =============================================================================
// Line Decoder
// =============================================================================

/// Decoder for line-oriented scanners: each frame already is the code.
///
/// A frame is emitted only if one of the enabled symbologies accepts it.
#[derive(Debug, Default, Clone)]
pub struct LineDecoder;

impl LineDecoder {
    pub fn new() -> Self {
        LineDecoder
    }
}

impl Decoder for LineDecoder {
    fn start(
        &mut self,
        stream: Option<&MediaStream>,
        symbologies: &[Symbology],
    ) -> Result<Subscription, DecoderError> {
        let stream = stream.ok_or(DecoderError::NoStream)?;
        let frames = stream.frames().ok_or(DecoderError::NoStream)?;

        if symbologies.is_empty() {
            return Err(DecoderError::Init("no symbologies enabled".into()));
        }

        let (tx, rx) = mpsc::channel(DETECTION_BUFFER);
        let task = tokio::spawn(decode_frames(
            frames,
            stream.ended(),
            symbologies.to_vec(),
            tx,
        ));

        debug!(stream = %stream.id(), ?symbologies, "Decoder started");
        Ok(Subscription::new(rx, Some(task)))
    }
}

async fn decode_frames(
    mut frames: broadcast::Receiver<String>,
    mut ended: watch::Receiver<bool>,
    symbologies: Vec<Symbology>,
    detections: mpsc::Sender<String>,
) {
    loop {
        // Frames already queued win over the end signal.
        let received = tokio::select! {
            biased;
            received = frames.recv() => received,
            _ = source_ended(&mut ended) => {
                debug!("Frame source ended");
                break;
            }
        };

        let frame = match received {
            Ok(frame) => frame,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Decoder fell behind; frames dropped");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let code = frame.trim();
        match Symbology::detect(code, &symbologies) {
            Some(symbology) => {
                trace!(code, %symbology, "Decoded");
                if detections.send(code.to_string()).await.is_err() {
                    break;
                }
            }
            None => debug!(frame = %code, "No enabled symbology matches frame"),
        }
    }
}

/// Resolves once the stream's source is done, or its end signal is gone.
async fn source_ended(ended: &mut watch::Receiver<bool>) {
    while !*ended.borrow_and_update() {
        if ended.changed().await.is_err() {
            return;
        }
    }
}
