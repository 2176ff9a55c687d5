//! # Camera Acquisition
//!
//! The frame source the decoder binds to.
//!
//! ## Frame Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   console ("-")                  device file (/dev/ttyACM0, ...)        │
//! │   ─────────────                  ───────────────────────────────        │
//! │   stdin line ─► controller       reader thread ─► one line per scan     │
//! │        │        push_frame()            │                               │
//! │        ▼                                ▼                               │
//! │   ┌─────────────────────────────────────────────────────────────────┐   │
//! │   │        MediaStream (broadcast::Sender<String> of frames)        │   │
//! │   └───────────────────────────────┬─────────────────────────────────┘   │
//! │                                   │ frames()                            │
//! │                                   ▼                                     │
//! │                            Decoder subscription                         │
//! │                                                                         │
//! │  Releasing the stream (stop() or drop) closes it for new subscribers   │
//! │  and ends the device reader at its next line. A device that closes     │
//! │  raises the stream's end signal so decoding ends too.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pantry_core::FacingMode;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::CameraError;

/// Frames buffered per subscriber before the oldest are dropped.
pub const FRAME_BUFFER: usize = 64;

// =============================================================================
// Camera Trait
// =============================================================================

/// Something that can hand out a live frame stream.
#[async_trait]
pub trait Camera: Send {
    /// Requests a stream facing `facing`.
    async fn acquire(&mut self, facing: FacingMode) -> Result<MediaStream, CameraError>;
}

// =============================================================================
// Media Stream
// =============================================================================

/// A live frame stream held for the length of a session.
pub struct MediaStream {
    id: Uuid,
    label: String,
    frames: broadcast::Sender<String>,
    active: Arc<AtomicBool>,
    ended: Arc<watch::Sender<bool>>,
}

impl MediaStream {
    pub fn new(label: impl Into<String>, frames: broadcast::Sender<String>) -> Self {
        MediaStream {
            id: Uuid::new_v4(),
            label: label.into(),
            frames,
            active: Arc::new(AtomicBool::new(true)),
            ended: Arc::new(watch::channel(false).0),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// New receiver for frames, or `None` once the stream is released.
    pub fn frames(&self) -> Option<broadcast::Receiver<String>> {
        self.is_active().then(|| self.frames.subscribe())
    }

    /// Flag shared with a feeder so it can notice the stream was released.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    /// Flips to `true` once the source has no more frames to give.
    pub fn ended(&self) -> watch::Receiver<bool> {
        self.ended.subscribe()
    }

    /// Handle a feeder uses to raise [`MediaStream::ended`].
    pub fn end_signal(&self) -> Arc<watch::Sender<bool>> {
        self.ended.clone()
    }

    /// Releases the stream. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            info!(stream = %self.id, label = %self.label, "Camera stream released");
        }
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// Device Camera
// =============================================================================

/// Where a [`DeviceCamera`] reads its frames from.
#[derive(Debug, Clone)]
enum Source {
    /// Lines typed on the console, pushed by the controller.
    Console(broadcast::Sender<String>),
    /// A line-oriented scanner device (keyboard wedge, serial).
    Device(PathBuf),
}

/// Camera backed by a line-oriented barcode scanner.
///
/// Each line the device produces is one frame.
#[derive(Debug, Clone)]
pub struct DeviceCamera {
    source: Source,
}

impl DeviceCamera {
    /// Console frames; the caller keeps `feed` to push lines into it.
    pub fn console(feed: broadcast::Sender<String>) -> Self {
        DeviceCamera {
            source: Source::Console(feed),
        }
    }

    pub fn device(path: impl Into<PathBuf>) -> Self {
        DeviceCamera {
            source: Source::Device(path.into()),
        }
    }
}

#[async_trait]
impl Camera for DeviceCamera {
    async fn acquire(&mut self, facing: FacingMode) -> Result<MediaStream, CameraError> {
        if facing != FacingMode::Environment {
            debug!(%facing, "Line scanners have no facing; ignoring");
        }

        match &self.source {
            Source::Console(feed) => Ok(MediaStream::new("console", feed.clone())),
            Source::Device(path) => {
                let file = std::fs::File::open(path)?;
                let (frames, _) = broadcast::channel(FRAME_BUFFER);
                let stream = MediaStream::new(path.display().to_string(), frames.clone());
                let active = stream.active_flag();
                let ended = stream.end_signal();
                let label = stream.label().to_string();

                std::thread::Builder::new()
                    .name("scanner-device".into())
                    .spawn(move || {
                        feed_lines(std::io::BufReader::new(file), &frames, &active);
                        ended.send_replace(true);
                    })
                    .map_err(CameraError::from)?;

                info!(device = %label, "Scanner device opened");
                Ok(stream)
            }
        }
    }
}

/// Forwards each non-empty line of `reader` as a frame until the stream is
/// released or the device closes. Returns the number of frames forwarded.
pub fn feed_lines<R: BufRead>(
    reader: R,
    frames: &broadcast::Sender<String>,
    active: &AtomicBool,
) -> usize {
    let mut forwarded = 0;

    for line in reader.lines() {
        if !active.load(Ordering::SeqCst) {
            break;
        }

        match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                // No receivers just means nobody is scanning right now.
                match frames.send(line.to_string()) {
                    Ok(_) => forwarded += 1,
                    Err(_) => debug!(frame = %line, "Not scanning; frame dropped"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Scanner device read failed");
                break;
            }
        }
    }

    debug!(forwarded, "Scanner device reader finished");
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_console_stream_delivers_frames() {
        let (feed, _) = broadcast::channel(8);
        let mut camera = DeviceCamera::console(feed.clone());

        let stream = camera.acquire(FacingMode::Environment).await.unwrap();
        assert!(stream.is_active());
        assert_eq!(stream.label(), "console");

        let mut frames = stream.frames().unwrap();
        feed.send("4006381333931".to_string()).unwrap();
        assert_eq!(frames.recv().await.unwrap(), "4006381333931");
    }

    #[tokio::test]
    async fn test_missing_device_is_no_device() {
        let mut camera = DeviceCamera::device("/definitely/not/a/scanner");
        let err = camera.acquire(FacingMode::Environment).await.unwrap_err();
        assert!(matches!(err, CameraError::NoDevice(_)));
    }

    #[test]
    fn test_stop_releases_stream() {
        let (feed, _) = broadcast::channel(8);
        let mut stream = MediaStream::new("console", feed);
        let flag = stream.active_flag();

        stream.stop();
        assert!(!stream.is_active());
        assert!(stream.frames().is_none());
        assert!(!flag.load(Ordering::SeqCst));

        // Idempotent
        stream.stop();
    }

    #[test]
    fn test_drop_releases_stream() {
        let (feed, _) = broadcast::channel(8);
        let stream = MediaStream::new("console", feed);
        let flag = stream.active_flag();

        drop(stream);
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_feed_lines_skips_blank_lines() {
        let (frames, mut rx) = broadcast::channel(8);
        let active = AtomicBool::new(true);
        let input = Cursor::new("123\n\n  96385074 \r\n");

        assert_eq!(feed_lines(input, &frames, &active), 2);
        assert_eq!(rx.try_recv().unwrap(), "123");
        assert_eq!(rx.try_recv().unwrap(), "96385074");
    }

    #[tokio::test]
    async fn test_device_eof_raises_end_signal() {
        let path = std::env::temp_dir().join(format!("pantry-scan-dev-{}", Uuid::new_v4()));
        std::fs::write(&path, "").unwrap();

        let mut camera = DeviceCamera::device(&path);
        let stream = camera.acquire(FacingMode::Environment).await.unwrap();
        let mut ended = stream.ended();

        tokio::time::timeout(std::time::Duration::from_secs(2), ended.wait_for(|e| *e))
            .await
            .unwrap()
            .unwrap();

        // The stream itself stays held until the session releases it
        assert!(stream.is_active());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_feed_lines_without_subscriber_drops_frames() {
        let (frames, rx) = broadcast::channel(8);
        drop(rx);
        let active = AtomicBool::new(true);

        assert_eq!(feed_lines(Cursor::new("123
"), &frames, &active), 0);
    }

    #[test]
    fn test_feed_lines_stops_when_released() {
        let (frames, _rx) = broadcast::channel(8);
        let active = AtomicBool::new(false);

        assert_eq!(feed_lines(Cursor::new("123\n456\n"), &frames, &active), 0);
    }
}
