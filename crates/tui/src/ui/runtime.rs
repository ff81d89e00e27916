//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Fetch the catalog once in the background and hand the result to `App`.
//! - Route input to `MainView` and execute the returned `Effect`s.
//!
//! A dedicated input thread blocks on `crossterm::event::read()` and forwards
//! events over a channel. Ticks are fast while the catalog is loading and
//! slow once it settled.
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use marquee_engine::Location;
use marquee_types::{Catalog, Effect, LoadError, Msg};
use marquee_util::CatalogSource;
use ratatui::{Terminal, prelude::*};
use std::time::{Duration, Instant};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel. Mouse moves are throttled to one
/// per 16 ms.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        let sixteen_ms = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            };
            let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
            if is_mouse_move {
                if last_mouse_move.elapsed() < sixteen_ms {
                    continue;
                }
                last_mouse_move = Instant::now();
            }
            if sender.blocking_send(event).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn load_result_to_msg(joined: Result<Result<Catalog, LoadError>, tokio::task::JoinError>) -> Msg {
    match joined {
        Ok(Ok(catalog)) => Msg::CatalogLoaded(catalog),
        Ok(Err(error)) => Msg::CatalogLoadFailed(error.to_string()),
        Err(error) => Msg::CatalogLoadFailed(format!("catalog task failed: {error}")),
    }
}

/// Entry point for the TUI runtime: sets up the terminal, starts the catalog
/// fetch, runs the event loop and restores the terminal on exit.
///
/// Returns the location for the filters active when the user quit.
pub async fn run_app(mut app: App, source: CatalogSource) -> Result<Location> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::default();
    let mut terminal = setup_terminal()?;

    info!(%source, "loading catalog");
    let mut catalog_task: Option<JoinHandle<Result<Catalog, LoadError>>> = Some(tokio::spawn(async move { source.load().await }));

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = fast_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    loop {
        let target_interval = if app.is_loading() { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects: Vec<Effect> = Vec::new();
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = &event
                    && is_quit_key(key_event)
                {
                    break;
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            joined = async {
                match catalog_task.as_mut() {
                    Some(task) => Some(task.await),
                    None => None,
                }
            }, if catalog_task.is_some() => {
                catalog_task = None;
                if let Some(joined) = joined {
                    effects.extend(main_view.handle_message(&mut app, load_result_to_msg(joined)));
                    needs_render = true;
                }
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = app.is_loading();
            }

            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            handle_navigation_effects(&mut main_view, &mut effects);
            cmd::run_cmds(&mut app, cmd::from_effects(effects));
            needs_render = true;
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    if let Some(task) = catalog_task.take() {
        debug!("aborting catalog fetch on shutdown");
        task.abort();
    }
    cleanup_terminal(&mut terminal)?;
    Ok(app.location().clone())
}

/// Applies modal changes and leaves the remaining effects for the command layer.
fn handle_navigation_effects(main_view: &mut MainView, effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(0.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => main_view.set_open_modal_kind(Some(modal)),
            Effect::CloseModal => main_view.set_open_modal_kind(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_types::Modal;

    #[test]
    fn navigation_effects_are_consumed() {
        let mut main_view = MainView::default();
        let mut effects = vec![
            Effect::ShowModal(Modal::CardDetail { rank: 4 }),
            Effect::OpenLink("https://example.com".into()),
        ];
        handle_navigation_effects(&mut main_view, &mut effects);
        assert_eq!(effects, vec![Effect::OpenLink("https://example.com".into())]);
        assert_eq!(main_view.open_modal_kind(), Some(&Modal::CardDetail { rank: 4 }));

        let mut effects = vec![Effect::CloseModal];
        handle_navigation_effects(&mut main_view, &mut effects);
        assert!(effects.is_empty());
        assert!(main_view.modal_view.is_none());
    }

    #[test]
    fn quit_keys_need_control() {
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    }

    #[test]
    fn load_errors_become_failure_messages() {
        let msg = load_result_to_msg(Ok(Err(LoadError::DuplicateRank(7))));
        assert!(matches!(msg, Msg::CatalogLoadFailed(reason) if reason.contains("duplicate rank 7")));
    }
}
