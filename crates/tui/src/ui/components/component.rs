//! Component system for the marquee TUI.
//!
//! Components are self-contained UI elements. They handle their own events,
//! read and update the shared [`App`] state, render into a provided `Rect`,
//! and report side effects back to the runtime as [`Effect`]s instead of
//! performing them directly.

use std::fmt::Debug;

use crossterm::event::{KeyEvent, MouseEvent};
use marquee_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI element with its own event handling and rendering.
///
/// ```rust,ignore
/// #[derive(Debug, Default)]
/// struct Banner;
///
/// impl Component for Banner {
///     fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
///         frame.render_widget(Paragraph::new("marquee").style(app.ctx.theme.text_primary_style()), rect);
///     }
/// }
/// ```
pub(crate) trait Component: Debug {
    /// Handle an application-level message.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component is the input target.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Coordinates are absolute terminal positions.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations may record hit areas for later mouse handling but
    /// should otherwise leave state changes to the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hints bar while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Splits `area` into the regions this component renders into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
