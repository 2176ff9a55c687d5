//! # Interactive Console
//!
//! Parses stdin lines into commands for the scan session.
//!
//! ```text
//! ┌──────────────────────┬───────────────────────────────────────────────┐
//! │ Input                │ Command                                       │
//! ├──────────────────────┼───────────────────────────────────────────────┤
//! │ scan, s              │ start a scanning session                      │
//! │ stop                 │ stop scanning without a detection             │
//! │ purchase, p          │ purchase the current product                  │
//! │ consume, c           │ consume the current product                   │
//! │ open, o              │ open the current product                      │
//! │ qty <n>              │ set the quantity input (blank = 1)            │
//! │ help, h, ?           │ list commands                                 │
//! │ quit, q, exit        │ end the session                               │
//! │ anything else        │ a frame for the console camera                │
//! └──────────────────────┴───────────────────────────────────────────────┘
//! ```
//!
//! Stdin is read on a plain OS thread: a blocking read parked inside the
//! tokio runtime would hold up shutdown until the next Enter.

use std::io::BufRead;

use pantry_core::ProductAction;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Console command summary.
pub const HELP: &str = "\
Commands:
  scan, s          start scanning
  stop             stop scanning
  purchase, p      purchase the current product
  consume, c       consume the current product
  open, o          open the current product
  qty <n>          set quantity (blank = 1)
  help             show this help
  quit, q          exit
Any other line is read as a scanned barcode.";

/// One console input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Scan,
    Stop,
    Action(ProductAction),
    Quantity(String),
    Help,
    Quit,
    /// Raw input for the console camera.
    Frame(String),
}

impl ConsoleCommand {
    /// Parses one line. Blank lines are `None`.
    pub fn parse(line: &str) -> Option<ConsoleCommand> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_lowercase().as_str(), rest.is_empty()) {
            ("scan" | "s", true) => ConsoleCommand::Scan,
            ("stop", true) => ConsoleCommand::Stop,
            ("purchase" | "p", true) => ConsoleCommand::Action(ProductAction::Purchase),
            ("consume" | "c", true) => ConsoleCommand::Action(ProductAction::Consume),
            ("open" | "o", true) => ConsoleCommand::Action(ProductAction::Open),
            ("qty" | "quantity", _) => ConsoleCommand::Quantity(rest.to_string()),
            ("help" | "h" | "?", true) => ConsoleCommand::Help,
            ("quit" | "q" | "exit", true) => ConsoleCommand::Quit,
            _ => ConsoleCommand::Frame(line.to_string()),
        };

        Some(command)
    }
}

/// Forwards parsed lines until `quit`, end of input, or a closed channel.
///
/// End of input is forwarded as [`ConsoleCommand::Quit`].
pub fn forward_lines<R: BufRead>(reader: R, commands: &mpsc::Sender<ConsoleCommand>) {
    for line in reader.lines() {
        let Ok(line) = line else { break };
        let Some(command) = ConsoleCommand::parse(&line) else {
            continue;
        };

        let quit = command == ConsoleCommand::Quit;
        if commands.blocking_send(command).is_err() || quit {
            return;
        }
    }

    debug!("Console input closed");
    let _ = commands.blocking_send(ConsoleCommand::Quit);
}

/// Reads stdin on a dedicated thread.
pub fn spawn_stdin_reader(commands: mpsc::Sender<ConsoleCommand>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("console-input".into())
        .spawn(move || forward_lines(std::io::stdin().lock(), &commands))?;
    Ok(())
}

/// Turns Ctrl-C into a `quit` command.
pub fn spawn_ctrl_c(commands: mpsc::Sender<ConsoleCommand>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            let _ = commands.send(ConsoleCommand::Quit).await;
        }
    });
}
