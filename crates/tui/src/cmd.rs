//! # Command Execution Layer
//!
//! Translates application effects (`Effect`) into imperative commands
//! (`Cmd`) and executes them. This is the boundary where the pure state
//! handling of pages meets side effects such as writing to the system
//! clipboard or leaving the application.

use rview_types::Effect;
use tracing::{debug, warn};

use crate::app::{App, AppHandle};

/// Side-effectful system commands executed outside of key handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),
    /// Stop the event loop.
    Exit,
}

/// Convert application [`Effect`]s into [`Cmd`]s.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::CopyToClipboardRequested(text) => Cmd::ClipboardSet(text),
            Effect::Quit => Cmd::Exit,
        })
        .collect()
}

/// Executes the commands derived from `effects`.
///
/// Returns `true` when one of them asked the application to exit; the
/// remaining commands still run.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> bool {
    let mut exit = false;
    for command in from_effects(effects) {
        match command {
            Cmd::ClipboardSet(text) => execute_clipboard_set(app, text),
            Cmd::Exit => exit = true,
        }
    }
    exit
}

/// Writes `text` to the system clipboard and reports the outcome.
fn execute_clipboard_set(app: &mut App, text: String) {
    let length = text.len();
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => {
            debug!(length, "Copied to clipboard");
            app.report("Copied to clipboard");
        }
        Err(error) => {
            warn!(error = %error, "Clipboard write failed");
            app.report_error(&format!("Clipboard error: {error}"));
        }
    }
}
