//! # Audible Feedback
//!
//! A short confirmation when a fresh barcode is accepted.

use std::io::Write;

use tracing::debug;

/// Plays the scan confirmation.
pub trait Beeper: Send {
    fn beep(&mut self);
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default)]
pub struct TerminalBeeper;

impl Beeper for TerminalBeeper {
    fn beep(&mut self) {
        let mut err = std::io::stderr();
        if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
            debug!(error = %e, "Terminal bell failed");
        }
    }
}

/// For `--no-beep` and `beep = false`.
#[derive(Debug, Default)]
pub struct SilentBeeper;

impl Beeper for SilentBeeper {
    fn beep(&mut self) {}
}

/// Picks the beeper for the configured `beep` setting.
pub fn beeper_for(enabled: bool) -> Box<dyn Beeper> {
    if enabled {
        Box::new(TerminalBeeper)
    } else {
        Box::new(SilentBeeper)
    }
}
