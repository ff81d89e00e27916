use marquee_engine::FilterOptions;
use marquee_types::{FilterState, SortOrder};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

use crate::ui::components::common::{SelectOption, SelectState, TextInputState};

pub const ALL_GENRES_LABEL: &str = "All genres";
pub const ALL_YEARS_LABEL: &str = "All years";

/// Filter form and card list selection.
///
/// The form mirrors the live filter state but is only read back into it on
/// submit (Enter or the Search button) or when a select changes.
#[derive(Debug, Clone)]
pub struct BrowserState {
    container_focus: FocusFlag,
    pub f_search: FocusFlag,
    pub f_search_button: FocusFlag,
    pub f_genre: FocusFlag,
    pub f_year: FocusFlag,
    pub f_order: FocusFlag,
    pub f_clear: FocusFlag,
    pub f_cards: FocusFlag,

    pub search: TextInputState,
    pub genre: SelectState,
    pub year: SelectState,
    pub order: SelectState,
    pub list_state: ListState,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            container_focus: FocusFlag::named("browser"),
            f_search: FocusFlag::named("browser.search"),
            f_search_button: FocusFlag::named("browser.search_button"),
            f_genre: FocusFlag::named("browser.genre"),
            f_year: FocusFlag::named("browser.year"),
            f_order: FocusFlag::named("browser.order"),
            f_clear: FocusFlag::named("browser.clear"),
            f_cards: FocusFlag::named("browser.cards"),
            search: TextInputState::new(),
            genre: SelectState::new(vec![SelectOption::new("", ALL_GENRES_LABEL)]),
            year: SelectState::new(vec![SelectOption::new("", ALL_YEARS_LABEL)]),
            order: SelectState::new(
                SortOrder::ALL
                    .iter()
                    .map(|order| SelectOption::new(order.as_param(), order.label()))
                    .collect(),
            ),
            list_state: ListState::default(),
        }
    }
}

impl BrowserState {
    /// Populates the genre and year selects. Existing values are kept.
    pub fn set_options(&mut self, options: &FilterOptions) {
        let genres = std::iter::once(SelectOption::new("", ALL_GENRES_LABEL))
            .chain(options.genres.iter().map(|genre| SelectOption::new(genre.as_str(), genre.as_str())))
            .collect();
        self.genre.set_options(genres);

        let years = std::iter::once(SelectOption::new("", ALL_YEARS_LABEL))
            .chain(options.year_values().into_iter().map(|year| SelectOption::new(year.clone(), year)))
            .collect();
        self.year.set_options(years);
    }

    /// Writes a filter state into the form controls.
    pub fn load_state(&mut self, state: &FilterState) {
        self.search.set_input(state.query.as_str());
        self.genre.set_value(state.genre.as_str());
        self.year.set_value(state.year.as_str());
        self.order.set_value(state.order.as_param());
    }

    /// Reads the form controls as a filter state.
    pub fn form_state(&self) -> FilterState {
        FilterState {
            query: self.search.input().to_string(),
            genre: self.genre.value().to_string(),
            year: self.year.value().to_string(),
            order: SortOrder::from_param(self.order.value()),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Selects the first of `len` cards and scrolls back to the top.
    pub fn reset_selection(&mut self, len: usize) {
        self.list_state = ListState::default();
        self.clamp_selection(len);
    }

    /// Keeps the selection inside a list of `len` cards.
    pub fn clamp_selection(&mut self, len: usize) {
        match (self.list_state.selected(), len) {
            (_, 0) => self.list_state.select(None),
            (Some(index), _) if index >= len => self.list_state.select(Some(len - 1)),
            (None, _) => self.list_state.select(Some(0)),
            _ => {}
        }
    }
}

impl HasFocus for BrowserState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_search);
        builder.leaf_widget(&self.f_search_button);
        builder.leaf_widget(&self.f_genre);
        builder.leaf_widget(&self.f_year);
        builder.leaf_widget(&self.f_order);
        builder.leaf_widget(&self.f_clear);
        builder.leaf_widget(&self.f_cards);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
