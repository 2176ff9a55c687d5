//! # Scan Session State
//!
//! The only mutable state the scanner owns: whether the decoder is running
//! and which barcodes have already been forwarded in this session.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  begin_session()   ┌──────────┐  register_detection()       │
//! │   │ Idle │ ─────────────────► │ Scanning │ ─────────── (Fresh) ──┐     │
//! │   └──────┘                    └──────────┘                       │     │
//! │      ▲  ▲    abort_session() /     │                             ▼     │
//! │      │  └────── stop() ────────────┘                ┌──────────────────┐│
//! │      │                                              │ AwaitingResponse ││
//! │      └──────────── complete_response() ──────────── └──────────────────┘│
//! │                                                                         │
//! │  handled-set: cleared by begin_session(), grown by register_detection() │
//! │  and shrunk only by release() after a transport failure                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Where the controller is in the scan → lookup cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    /// Decoder active, waiting for a detection.
    Scanning,
    /// Decoder stopped, one lookup in flight.
    AwaitingResponse,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Idle => write!(f, "idle"),
            ScanPhase::Scanning => write!(f, "scanning"),
            ScanPhase::AwaitingResponse => write!(f, "awaiting-response"),
        }
    }
}

/// Result of offering a detection to the handled-set gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// First sighting this session; forward it.
    Fresh,
    /// Already forwarded this session; drop it.
    Duplicate,
}

/// Scan state for one controller.
#[derive(Debug, Default)]
pub struct ScanState {
    phase: ScanPhase,
    handled: HashSet<String>,
    session_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only while the decoder is active.
    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Identifier of the current (or last) scanning session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Milliseconds since the current (or last) session began.
    pub fn elapsed_ms(&self) -> Option<i64> {
        self.started_at
            .map(|started| (Utc::now() - started).num_milliseconds())
    }

    /// Starts a new session.
    ///
    /// Returns `false` without touching anything if a session is already
    /// scanning. Otherwise clears the handled-set.
    pub fn begin_session(&mut self) -> bool {
        if self.is_scanning() {
            return false;
        }

        self.handled.clear();
        self.phase = ScanPhase::Scanning;
        self.session_id = Some(Uuid::new_v4());
        self.started_at = Some(Utc::now());
        true
    }

    /// Decoder failed to start; fall back to idle.
    pub fn abort_session(&mut self) {
        self.phase = ScanPhase::Idle;
    }

    /// User stopped scanning without a detection.
    pub fn stop(&mut self) {
        if self.is_scanning() {
            self.phase = ScanPhase::Idle;
        }
    }

    /// Gate for decoder detections: at most one forward per code per session.
    pub fn register_detection(&mut self, code: &str) -> Detection {
        if self.handled.contains(code) {
            return Detection::Duplicate;
        }

        self.handled.insert(code.to_string());
        self.phase = ScanPhase::AwaitingResponse;
        Detection::Fresh
    }

    /// Any backend response (or failure) ends the wait.
    pub fn complete_response(&mut self) {
        if self.phase == ScanPhase::AwaitingResponse {
            self.phase = ScanPhase::Idle;
        }
    }

    /// Forgets `code` so the same physical scan can be retried.
    pub fn release(&mut self, code: &str) -> bool {
        self.handled.remove(code)
    }

    pub fn is_handled(&self, code: &str) -> bool {
        self.handled.contains(code)
    }

    pub fn handled_count(&self) -> usize {
        self.handled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_session_is_idempotent_while_scanning() {
        let mut state = ScanState::new();
        assert!(state.begin_session());
        let first = state.session_id();

        assert!(!state.begin_session());
        assert_eq!(state.session_id(), first);
        assert!(state.is_scanning());
    }

    #[test]
    fn test_elapsed_tracks_current_session() {
        let mut state = ScanState::new();
        assert_eq!(state.elapsed_ms(), None);

        state.begin_session();
        let started = state.started_at().unwrap();
        assert!(state.elapsed_ms().unwrap() >= 0);
        assert!(started <= Utc::now());
    }

    #[test]
    fn test_duplicate_detection_is_dropped() {
        let mut state = ScanState::new();
        state.begin_session();

        assert_eq!(state.register_detection("123"), Detection::Fresh);
        assert_eq!(state.phase(), ScanPhase::AwaitingResponse);
        assert_eq!(state.register_detection("123"), Detection::Duplicate);
        assert_eq!(state.handled_count(), 1);
    }

    #[test]
    fn test_new_session_clears_handled_set() {
        let mut state = ScanState::new();
        state.begin_session();
        state.register_detection("123");
        state.complete_response();
        assert_eq!(state.phase(), ScanPhase::Idle);

        assert!(state.begin_session());
        assert!(!state.is_handled("123"));
        assert_eq!(state.register_detection("123"), Detection::Fresh);
    }

    #[test]
    fn test_release_allows_rescan() {
        let mut state = ScanState::new();
        state.begin_session();
        state.register_detection("123");

        assert!(state.release("123"));
        assert!(!state.release("123"));
        assert_eq!(state.register_detection("123"), Detection::Fresh);
    }

    #[test]
    fn test_abort_and_stop_return_to_idle() {
        let mut state = ScanState::new();
        state.begin_session();
        state.abort_session();
        assert!(!state.is_scanning());

        state.begin_session();
        state.stop();
        assert_eq!(state.phase(), ScanPhase::Idle);
    }

    #[test]
    fn test_stop_does_not_cancel_pending_response() {
        let mut state = ScanState::new();
        state.begin_session();
        state.register_detection("123");
        state.stop();
        assert_eq!(state.phase(), ScanPhase::AwaitingResponse);
    }
}
