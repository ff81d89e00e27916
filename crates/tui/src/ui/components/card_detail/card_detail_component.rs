//! Expanded card, shown as a modal over the card list.
//!
//! Focus starts on the Close button. Tab moves between Close and the
//! streaming link; Escape or a click outside the modal collapses the card.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use marquee_engine::{ActivationTarget, CardKey, CardView, FocusTarget, STREAMING_LINK_LABEL};
use marquee_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const CLOSE_LABEL: &str = "Close";

#[derive(Debug, Default, Clone, Copy)]
struct DetailLayout {
    modal_area: Rect,
    close_button: Rect,
    link_button: Rect,
}

#[derive(Debug)]
pub struct CardDetailComponent {
    rank: u32,
    layout: DetailLayout,
}

impl CardDetailComponent {
    pub fn new(rank: u32) -> Self {
        Self {
            rank,
            layout: DetailLayout::default(),
        }
    }

    fn open_link(&self, app: &mut App) -> Vec<Effect> {
        let Some(url) = app.card(self.rank).map(|card| card.streaming_url.clone()) else {
            return Vec::new();
        };
        let transition = app.cards.activate(self.rank, ActivationTarget::StreamingLink);
        let mut effects = app.apply_transition(transition);
        effects.push(Effect::OpenLink(url));
        effects
    }

    fn close(&self, app: &mut App) -> Vec<Effect> {
        let transition = app.cards.activate(self.rank, ActivationTarget::CloseControl);
        app.apply_transition(transition)
    }
}

impl Component for CardDetailComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                let outcome = app.cards.key(None, CardKey::Escape);
                app.apply_transition(outcome.transition)
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                app.cards.cycle_focus();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') => match app.cards.focus() {
                Some(FocusTarget::StreamingLink(_)) => self.open_link(app),
                Some(FocusTarget::CloseControl(_)) => self.close(app),
                _ => Vec::new(),
            },
            KeyCode::Char('w') => self.open_link(app),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        if self.layout.close_button.contains(pos) {
            return self.close(app);
        }
        if self.layout.link_button.contains(pos) {
            return self.open_link(app);
        }
        if !self.layout.modal_area.contains(pos) {
            let transition = app.cards.activate_overlay();
            return app.apply_transition(transition);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let Some(card) = app.card(self.rank) else {
            return;
        };
        let focus = app.cards.focus();

        frame.render_widget(Clear, rect);
        let block = th::block(theme, Some(card.heading.as_str()), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [body_area, buttons_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(inner);
        let lines = detail_lines(card, theme, body_area.width);
        frame.render_widget(Paragraph::new(lines).style(theme.text_primary_style()), body_area);

        let link_width = STREAMING_LINK_LABEL.width() as u16 + 4;
        let [close_button, link_button, _] = Layout::horizontal([
            Constraint::Length(CLOSE_LABEL.width() as u16 + 4),
            Constraint::Length(link_width),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(buttons_area);
        th::render_button(frame, close_button, CLOSE_LABEL, matches!(focus, Some(FocusTarget::CloseControl(_))), theme);
        th::render_button(
            frame,
            link_button,
            STREAMING_LINK_LABEL,
            matches!(focus, Some(FocusTarget::StreamingLink(_))),
            theme,
        );

        self.layout = DetailLayout {
            modal_area: rect,
            close_button,
            link_button,
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[("Esc", " Close  "), ("Tab", " Switch  "), ("Enter", " Activate  "), ("w", " Where to watch?  ")],
        )
    }
}

fn detail_lines<'a>(card: &'a CardView, theme: &dyn Theme, width: u16) -> Vec<Line<'a>> {
    let label_style = theme.text_secondary_style().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("★ {}", card.rating), theme.status_warning()),
            Span::styled(format!("  ·  {}", card.year), theme.text_secondary_style()),
        ]),
        Line::from(Span::styled(card.genres.as_str(), theme.text_muted_style())),
        Line::from(vec![
            Span::styled("Created by ", label_style),
            Span::styled(card.creator.as_str(), theme.text_primary_style()),
        ]),
        Line::from(""),
    ];
    lines.extend(
        textwrap::wrap(&card.synopsis, usize::from(width.max(1)))
            .into_iter()
            .map(|line| Line::from(line.into_owned())),
    );
    lines
}
