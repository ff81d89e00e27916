use super::components::{BrowserComponent, CardDetailComponent, Component};
use super::theme::theme_helpers as th;
use crate::app::App;
use crate::ui::utils::centered_min_max;
use crossterm::event::{KeyEvent, MouseEvent};
use marquee_types::{Effect, Modal, Msg};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Paragraph},
};

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

/// Root component: header, the browser, the hints bar and at most one modal.
#[derive(Debug)]
pub struct MainView {
    pub content_view: Box<dyn Component>,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,
    open_modal_kind: Option<Modal>,
}

impl Default for MainView {
    fn default() -> Self {
        Self::new(Box::new(BrowserComponent::default()))
    }
}

impl MainView {
    pub fn new(content_view: Box<dyn Component>) -> Self {
        Self {
            content_view,
            modal_view: None,
            open_modal_kind: None,
        }
    }

    pub fn open_modal_kind(&self) -> Option<&Modal> {
        self.open_modal_kind.as_ref()
    }

    /// Update the open modal kind (use None to clear).
    pub fn set_open_modal_kind(&mut self, modal: Option<Modal>) {
        self.modal_view = modal.as_ref().map(|modal_kind| match modal_kind {
            Modal::CardDetail { rank } => (
                Box::new(CardDetailComponent::new(*rank)) as Box<dyn Component>,
                ModalLayout(Box::new(|rect| {
                    centered_min_max(70, 70, Rect::new(0, 0, 50, 14), Rect::new(0, 0, 100, 30), rect)
                })),
            ),
        });
        self.open_modal_kind = modal;
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.handle_message(app, msg)),
            None => effects.extend(self.content_view.handle_message(app, msg)),
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        app.status = None;
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_mouse_events(app, mouse);
        }
        self.content_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        render_header(frame, layout[0], app);
        self.content_view.render(frame, layout[1], app);

        let status_line = match app.status.as_ref() {
            Some(status) => {
                let style = if status.is_error {
                    app.ctx.theme.status_error()
                } else {
                    app.ctx.theme.status_success()
                };
                Line::from(Span::styled(status.text.clone(), style))
            }
            None => Line::from(self.get_hint_spans(app)),
        };
        frame.render_widget(Paragraph::new(status_line).style(app.ctx.theme.text_muted_style()), layout[2]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(layout[1]);
            modal.render(frame, modal_area, app);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        match self.modal_view.as_ref() {
            Some((modal, _)) => hint_spans.extend(modal.get_hint_spans(app)),
            None => hint_spans.extend(self.content_view.get_hint_spans(app)),
        }
        hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[("Ctrl+Q", " Quit ")]));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Browser
            Constraint::Length(1), // Hints bar
        ])
        .split(area)
        .to_vec()
    }
}

/// Title, catalog source and the shareable location.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let line = Line::from(vec![
        Span::styled(" marquee ", theme.accent_emphasis_style()),
        Span::styled(format!(" {} ", app.ctx.source_label), theme.text_secondary_style()),
        Span::styled(format!(" {}", app.location()), theme.text_muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Dims everything behind the open modal.
fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}
