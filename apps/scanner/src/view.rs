//! # Status View
//!
//! The scanner's single status region plus the purchase / consume / open
//! controls. The terminal rendering writes one line per status change to
//! stdout; logs go to stderr so the two never interleave on a pipe.

use std::io::Write;

use pantry_core::Status;
use tracing::warn;

use crate::console::HELP;

/// Where the controller reports progress.
pub trait StatusView: Send {
    /// Replaces the status text.
    fn show_status(&mut self, status: &Status);

    /// Shows or hides the action controls.
    fn set_actions_visible(&mut self, visible: bool);

    /// Lists the console commands.
    fn show_help(&mut self) {}
}

/// Status view for a terminal.
pub struct TerminalView<W: Write + Send> {
    out: W,
    actions_visible: bool,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        TerminalView::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        TerminalView {
            out,
            actions_visible: false,
        }
    }

    pub fn actions_visible(&self) -> bool {
        self.actions_visible
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write status");
        }
    }
}

impl<W: Write + Send> StatusView for TerminalView<W> {
    fn show_status(&mut self, status: &Status) {
        let marker = if status.is_error() { "!" } else { ">" };
        self.write_line(&format!("{} {}", marker, status));
    }

    fn set_actions_visible(&mut self, visible: bool) {
        if visible && !self.actions_visible {
            self.write_line("  [p]urchase  [c]onsume  [o]pen  (qty <n> to change quantity)");
        }
        self.actions_visible = visible;
    }

    fn show_help(&mut self) {
        self.write_line(HELP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_status_lines() {
        let mut view = TerminalView::new(Vec::new());
        view.show_status(&Status::Scanning);
        view.show_status(&Status::LookupFailed);

        assert_eq!(
            output(view),
            "> Scanning for barcodes...\n! Error checking barcode. Please try again.\n"
        );
    }

    #[test]
    fn test_actions_hint_printed_once_per_reveal() {
        let mut view = TerminalView::new(Vec::new());
        view.set_actions_visible(true);
        view.set_actions_visible(true);
        assert!(view.actions_visible());

        view.set_actions_visible(false);
        assert!(!view.actions_visible());
        view.set_actions_visible(true);

        assert_eq!(output(view).matches("[p]urchase").count(), 2);
    }
}
