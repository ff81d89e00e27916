//! # Command Execution Layer
//!
//! This module translates application effects (`Effect`) into imperative
//! commands (`Cmd`) and executes them. It is the boundary where the pure
//! state updates of the app meet side effects such as:
//! - Opening a link in the system browser
//! - Writing to the system clipboard when the browser is unavailable
//!
//! Navigation effects (`ShowModal`, `CloseModal`) are handled by the runtime
//! before the remaining effects reach [`from_effects`].

use tracing::{debug, warn};

use crate::app::App;
use marquee_types::Effect;

/// Side-effectful system commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Open a URL in the default browser. Falls back to copying it into the
    /// system clipboard when no browser can be launched.
    OpenLink(String),
}

/// Convert application [`Effect`]s into [`Cmd`]s.
///
/// Effects that carry no side effect of their own are skipped.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::OpenLink(url) => Some(Cmd::OpenLink(url)),
            Effect::ShowModal(_) | Effect::CloseModal => None,
        })
        .collect()
}

/// Execute a batch of commands in order.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) {
    for command in commands {
        match command {
            Cmd::OpenLink(url) => execute_open_link(app, url),
        }
    }
}

/// Opens `url` in a new browser window, leaving the TUI running.
fn execute_open_link(app: &mut App, url: String) {
    match webbrowser::open(&url) {
        Ok(()) => {
            debug!(%url, "opened link in browser");
            app.set_status(format!("Opened {url}"), false);
        }
        Err(error) => {
            warn!(%url, %error, "failed to open browser; copying link instead");
            execute_clipboard_set(app, url);
        }
    }
}

/// Writes `text` to the system clipboard and reports the outcome in the
/// hints bar.
fn execute_clipboard_set(app: &mut App, text: String) {
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
        Ok(()) => app.set_status(format!("Copied {text} to the clipboard"), false),
        Err(e) => {
            warn!("Clipboard error: {}", e);
            app.set_status(format!("Could not open or copy {text}"), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_types::Modal;

    #[test]
    fn only_links_become_commands() {
        let commands = from_effects(vec![
            Effect::ShowModal(Modal::CardDetail { rank: 1 }),
            Effect::OpenLink("https://www.justwatch.com/br/busca?q=Monster".into()),
            Effect::CloseModal,
        ]);
        assert_eq!(commands, vec![Cmd::OpenLink("https://www.justwatch.com/br/busca?q=Monster".into())]);
    }
}
