//! Catalog browser: the filter bar and the card list.
//!
//! Focus order is search field, Search button, genre, year, order, Clear,
//! then the card list. Typing in the search field does not re-query; Enter
//! or the Search button does. Changing a select re-queries immediately.
//!
//! The card list draws the current `RenderedView`. When the view has no
//! cards the list area shows its single status message instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use marquee_engine::{ActivationTarget, CardKey, CardView, RenderedView, STREAMING_LINK_LABEL};
use marquee_types::Effect;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{HighlightSpacing, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::components::common::SelectState;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

/// Lines per card in the list, including the spacer.
const CARD_HEIGHT: usize = 5;
/// Row of the streaming link inside a card.
const LINK_ROW: usize = 3;
const HIGHLIGHT_SYMBOL: &str = "▌ ";
const SEARCH_PLACEHOLDER: &str = "Search by title...";

#[derive(Debug, Default, Clone, Copy)]
struct BrowserLayout {
    search_area: Rect,
    search_inner_area: Rect,
    search_button_area: Rect,
    genre_area: Rect,
    year_area: Rect,
    order_area: Rect,
    clear_area: Rect,
    cards_area: Rect,
}

#[derive(Debug, Default)]
pub struct BrowserComponent {
    layout: BrowserLayout,
}

/// What a click on the card list landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CardHit {
    index: usize,
    on_link: bool,
}

impl Component for BrowserComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                app.sync_card_focus();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                app.sync_card_focus();
                return Vec::new();
            }
            _ => {}
        }

        // The form is filled from the resolved filters once the catalog loads.
        if !app.is_ready() {
            return Vec::new();
        }

        let browser = &app.browser;
        if browser.f_search.get() {
            self.handle_search_keys(app, key)
        } else if browser.f_search_button.get() {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => app.submit_filters(),
                _ => Vec::new(),
            }
        } else if browser.f_genre.get() || browser.f_year.get() || browser.f_order.get() {
            self.handle_select_keys(app, key)
        } else if browser.f_clear.get() {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => app.clear_filters(),
                _ => Vec::new(),
            }
        } else if browser.f_cards.get() {
            self.handle_card_keys(app, key)
        } else {
            Vec::new()
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(app, pos),
            MouseEventKind::ScrollDown if self.layout.cards_area.contains(pos) => {
                self.scroll_cards(app, 1);
                Vec::new()
            }
            MouseEventKind::ScrollUp if self.layout.cards_area.contains(pos) => {
                self.scroll_cards(app, -1);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let rows = self.get_preferred_layout(app, rect);
        let search_row = Layout::horizontal([Constraint::Min(20), Constraint::Length(12)]).split(rows[0]);
        let filter_row = Layout::horizontal([
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(11),
        ])
        .split(rows[1]);

        let search_inner_area = self.render_search(frame, app, search_row[0]);
        th::render_button(frame, search_row[1], "Search", app.browser.f_search_button.get(), &*app.ctx.theme);
        render_select(frame, filter_row[0], "Genre", &app.browser.genre, app.browser.f_genre.get(), &*app.ctx.theme);
        render_select(frame, filter_row[1], "Year", &app.browser.year, app.browser.f_year.get(), &*app.ctx.theme);
        render_select(frame, filter_row[2], "Order", &app.browser.order, app.browser.f_order.get(), &*app.ctx.theme);
        th::render_button(frame, filter_row[3], "Clear", app.browser.f_clear.get(), &*app.ctx.theme);
        let cards_area = self.render_cards(frame, app, rows[2]);

        self.layout = BrowserLayout {
            search_area: search_row[0],
            search_inner_area,
            search_button_area: search_row[1],
            genre_area: filter_row[0],
            year_area: filter_row[1],
            order_area: filter_row[2],
            clear_area: filter_row[3],
            cards_area,
        };
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let browser = &app.browser;
        let hints: &[(&'static str, &'static str)] = if browser.f_search.get() {
            &[("Enter", " Search  "), ("Tab", " Next  ")]
        } else if browser.f_genre.get() || browser.f_year.get() || browser.f_order.get() {
            &[("←/→", " Change  "), ("Tab", " Next  ")]
        } else if browser.f_cards.get() {
            &[("↑/↓", " Move  "), ("Enter", " Expand  "), ("w", " Where to watch?  ")]
        } else {
            &[("Enter", " Activate  "), ("Tab", " Next  ")]
        };
        th::build_hint_spans(theme, hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(3), // Search field and button
            Constraint::Length(3), // Selects and Clear
            Constraint::Min(3),    // Cards
        ])
        .split(area)
        .to_vec()
    }
}

impl BrowserComponent {
    fn handle_search_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let search = &mut app.browser.search;
        match key.code {
            KeyCode::Enter => return app.submit_filters(),
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => search.insert_char(c),
            KeyCode::Backspace => search.backspace(),
            KeyCode::Delete => search.delete(),
            KeyCode::Left => search.move_left(),
            KeyCode::Right => search.move_right(),
            KeyCode::Home => search.move_home(),
            KeyCode::End => search.move_end(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_select_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(select) = focused_select(app) else {
            return Vec::new();
        };
        let changed = match key.code {
            KeyCode::Left | KeyCode::Up => select.select_prev(),
            KeyCode::Right | KeyCode::Down => select.select_next(),
            _ => false,
        };
        if changed { app.submit_filters() } else { Vec::new() }
    }

    fn handle_card_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let len = app.rendered().cards().len();
        let selected = app.browser.selected_index();
        let page = usize::from(self.layout.cards_area.height) / CARD_HEIGHT;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(app, -1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(app, 1);
                Vec::new()
            }
            KeyCode::PageUp => {
                self.move_selection(app, -(page.max(1) as isize));
                Vec::new()
            }
            KeyCode::PageDown => {
                self.move_selection(app, page.max(1) as isize);
                Vec::new()
            }
            KeyCode::Home => {
                app.select_card(0);
                Vec::new()
            }
            KeyCode::End => {
                app.select_card(len.saturating_sub(1));
                Vec::new()
            }
            KeyCode::Char('w') => {
                let Some((rank, url)) = app.selected_card().map(|card| (card.rank, card.streaming_url.clone())) else {
                    return Vec::new();
                };
                let transition = app.cards.activate(rank, ActivationTarget::StreamingLink);
                let mut effects = app.apply_transition(transition);
                effects.push(Effect::OpenLink(url));
                effects
            }
            code => {
                let card_key = match code {
                    KeyCode::Enter => CardKey::Enter,
                    KeyCode::Char(' ') => CardKey::Space,
                    KeyCode::Esc => CardKey::Escape,
                    _ => CardKey::Other,
                };
                let focused = selected.and_then(|index| app.rendered().cards().get(index)).map(|card| card.rank);
                let outcome = app.cards.key(focused, card_key);
                if card_key == CardKey::Space && !outcome.prevent_default {
                    self.move_selection(app, page.max(1) as isize);
                }
                app.apply_transition(outcome.transition)
            }
        }
    }

    fn handle_click(&mut self, app: &mut App, pos: Position) -> Vec<Effect> {
        let layout = self.layout;
        if layout.search_area.contains(pos) {
            app.focus.focus(&app.browser.f_search);
            app.sync_card_focus();
            let column = pos.x.saturating_sub(layout.search_inner_area.x);
            app.browser.search.set_cursor_from_column(column);
            return Vec::new();
        }
        if layout.search_button_area.contains(pos) {
            app.focus.focus(&app.browser.f_search_button);
            app.sync_card_focus();
            return app.submit_filters();
        }
        if layout.clear_area.contains(pos) {
            app.focus.focus(&app.browser.f_clear);
            app.sync_card_focus();
            return app.clear_filters();
        }
        for area in [layout.genre_area, layout.year_area, layout.order_area] {
            if area.contains(pos) {
                return self.click_select(app, area, pos);
            }
        }
        let Some(hit) = self.hit_test_cards(app, pos) else {
            return Vec::new();
        };
        app.focus.focus(&app.browser.f_cards);
        app.select_card(hit.index);
        let Some(card) = app.selected_card() else {
            return Vec::new();
        };
        let (rank, url) = (card.rank, card.streaming_url.clone());
        if hit.on_link {
            let transition = app.cards.activate(rank, ActivationTarget::StreamingLink);
            let mut effects = app.apply_transition(transition);
            effects.push(Effect::OpenLink(url));
            return effects;
        }
        let transition = app.cards.activate(rank, ActivationTarget::Body);
        app.apply_transition(transition)
    }

    /// A click on the left half of a select steps back, the right half forward.
    fn click_select(&self, app: &mut App, area: Rect, pos: Position) -> Vec<Effect> {
        let flag = if area == self.layout.genre_area {
            app.browser.f_genre.clone()
        } else if area == self.layout.year_area {
            app.browser.f_year.clone()
        } else {
            app.browser.f_order.clone()
        };
        app.focus.focus(&flag);
        app.sync_card_focus();
        if !app.is_ready() {
            return Vec::new();
        }
        let Some(select) = focused_select(app) else {
            return Vec::new();
        };
        let changed = if pos.x < area.x + area.width / 2 {
            select.select_prev()
        } else {
            select.select_next()
        };
        if changed { app.submit_filters() } else { Vec::new() }
    }

    fn move_selection(&self, app: &mut App, delta: isize) {
        let len = app.rendered().cards().len();
        if len == 0 {
            return;
        }
        let current = app.browser.selected_index().unwrap_or(0);
        let target = current.saturating_add_signed(delta).min(len - 1);
        app.select_card(target);
    }

    /// The card list ignores scrolling while a card is expanded.
    fn scroll_cards(&self, app: &mut App, delta: isize) {
        if app.cards.scroll_locked() {
            return;
        }
        self.move_selection(app, delta);
    }

    fn hit_test_cards(&self, app: &App, pos: Position) -> Option<CardHit> {
        let area = self.layout.cards_area;
        if !area.contains(pos) {
            return None;
        }
        let row = usize::from(pos.y - area.y);
        let index = app.browser.list_state.offset() + row / CARD_HEIGHT;
        if index >= app.rendered().cards().len() {
            return None;
        }
        let column = usize::from(pos.x - area.x);
        let link_start = HIGHLIGHT_SYMBOL.width();
        let on_link = row % CARD_HEIGHT == LINK_ROW && (link_start..link_start + STREAMING_LINK_LABEL.width()).contains(&column);
        Some(CardHit { index, on_link })
    }

    /// Renders the search field and returns its inner area.
    fn render_search(&self, frame: &mut Frame, app: &App, area: Rect) -> Rect {
        let theme = &*app.ctx.theme;
        let focused = app.browser.f_search.get();
        let block = th::block(theme, Some("Search"), focused);
        let inner = block.inner(area);
        let search = &app.browser.search;
        let line = if search.input().is_empty() && !focused {
            Line::from(Span::styled(SEARCH_PLACEHOLDER, theme.text_muted_style()))
        } else {
            Line::from(Span::styled(search.input(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
        if focused {
            frame.set_cursor_position(Position::new(inner.x + search.cursor_column().min(inner.width), inner.y));
        }
        inner
    }

    /// Renders the card list (or its status message) and returns the inner area.
    fn render_cards(&self, frame: &mut Frame, app: &mut App, area: Rect) -> Rect {
        let theme = &*app.ctx.theme;
        let focused = app.browser.f_cards.get();
        let title = match app.rendered() {
            RenderedView::Cards(cards) => format!("Titles ({})", cards.len()),
            _ => "Titles".to_string(),
        };
        let block = th::block(theme, Some(title.as_str()), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rendered = app.rendered();
        if let Some(message) = rendered.indicator() {
            let style = match rendered {
                RenderedView::LoadFailed { .. } => theme.status_error(),
                RenderedView::NoResults { .. } => theme.status_warning(),
                _ => theme.text_muted_style(),
            };
            let centered = Layout::vertical([Constraint::Fill(1), Constraint::Length(2), Constraint::Fill(1)]).split(inner);
            frame.render_widget(
                Paragraph::new(message)
                    .style(style)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                centered[1],
            );
            return inner;
        }

        let items: Vec<ListItem> = rendered.cards().iter().map(|card| card_item(card, theme)).collect();
        let list = List::new(items)
            .highlight_style(th::list_selected_style(theme))
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .highlight_spacing(HighlightSpacing::Always);
        let mut list_state = app.browser.list_state.clone();
        frame.render_stateful_widget(list, inner, &mut list_state);
        app.browser.list_state = list_state;
        inner
    }
}

fn focused_select(app: &mut App) -> Option<&mut SelectState> {
    let browser = &mut app.browser;
    if browser.f_genre.get() {
        Some(&mut browser.genre)
    } else if browser.f_year.get() {
        Some(&mut browser.year)
    } else if browser.f_order.get() {
        Some(&mut browser.order)
    } else {
        None
    }
}

fn render_select(frame: &mut Frame, area: Rect, title: &str, select: &SelectState, focused: bool, theme: &dyn Theme) {
    let arrow_style = if focused { theme.accent_primary_style() } else { theme.text_muted_style() };
    let line = Line::from(vec![
        Span::styled("◂ ", arrow_style),
        Span::styled(select.label(), theme.text_primary_style()),
        Span::styled(" ▸", arrow_style),
    ]);
    frame.render_widget(Paragraph::new(line).block(th::block(theme, Some(title), focused)), area);
}

/// A collapsed card: heading, rating and year, genres, the streaming link
/// and a spacer line. Must stay `CARD_HEIGHT` lines tall.
fn card_item<'a>(card: &'a CardView, theme: &dyn Theme) -> ListItem<'a> {
    ListItem::new(vec![
        Line::from(Span::styled(card.heading.as_str(), theme.accent_emphasis_style())),
        Line::from(vec![
            Span::styled(format!("★ {}", card.rating), theme.status_warning()),
            Span::styled(format!("  ·  {}", card.year), theme.text_secondary_style()),
        ]),
        Line::from(Span::styled(card.genres.as_str(), theme.text_muted_style())),
        Line::from(Span::styled(STREAMING_LINK_LABEL, theme.link_style())),
        Line::from(Span::styled("", Style::default())),
    ])
}
