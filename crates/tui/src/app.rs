//! Application state for the marquee TUI.
//!
//! `App` owns everything the components read and mutate: the filter form,
//! the catalog session once loaded, the card expansion controller and the
//! focus ring. Components never talk to the engine directly; they go through
//! the methods here so the form, the derived view and the expansion state
//! stay in step.

use marquee_engine::{CardView, CatalogSession, ExpansionController, FilterSynchronizer, Location, RenderedView, Transition};
use marquee_types::{Catalog, Effect, Modal, Msg};
use marquee_util::JsonFilterStore;
use rat_focus::{Focus, FocusBuilder};
use tracing::{debug, error, warn};

use crate::ui::components::browser::BrowserState;
use crate::ui::theme::Theme;

/// Cross-cutting context shared by every component.
#[derive(Debug)]
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    /// Where the catalog comes from, for the header.
    pub source_label: String,
}

impl SharedCtx {
    pub fn new(theme: Box<dyn Theme>, source_label: impl Into<String>) -> Self {
        Self {
            theme,
            source_label: source_label.into(),
        }
    }
}

/// Lifecycle of the catalog. Loading happens exactly once.
#[derive(Debug)]
pub enum CatalogState {
    /// Waiting for the fetch; the synchronizer is held until the session starts.
    Loading(FilterSynchronizer<JsonFilterStore>),
    /// The fetch failed. Terminal for the session.
    Failed(Location),
    Ready(CatalogSession<JsonFilterStore>),
}

/// One-line feedback shown in the hints bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    pub browser: BrowserState,
    pub cards: ExpansionController,
    pub focus: Focus,
    pub status: Option<StatusMessage>,
    catalog: CatalogState,
    rendered: RenderedView,
}

impl App {
    pub fn new(ctx: SharedCtx, sync: FilterSynchronizer<JsonFilterStore>) -> Self {
        let browser = BrowserState::default();
        let focus = FocusBuilder::build_for(&browser);
        focus.focus(&browser.f_search);
        Self {
            ctx,
            browser,
            cards: ExpansionController::new(),
            focus,
            status: None,
            catalog: CatalogState::Loading(sync),
            rendered: RenderedView::Loading,
        }
    }

    /// Applies an application message to the shared state.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::CatalogLoaded(catalog) => self.start_session(catalog.clone()),
            Msg::CatalogLoadFailed(reason) => {
                self.fail_loading(reason);
                Vec::new()
            }
            Msg::Tick | Msg::Resize(..) => Vec::new(),
        }
    }

    fn start_session(&mut self, catalog: Catalog) -> Vec<Effect> {
        let sync = match std::mem::replace(&mut self.catalog, CatalogState::Failed(Location::default())) {
            CatalogState::Loading(sync) => sync,
            other => {
                warn!("catalog delivered after loading finished; ignoring");
                self.catalog = other;
                return Vec::new();
            }
        };
        let session = CatalogSession::start(catalog, sync);
        self.browser.set_options(session.options());
        self.browser.load_state(session.state());
        self.catalog = CatalogState::Ready(session);
        self.refresh_view()
    }

    fn fail_loading(&mut self, reason: &str) {
        let location = match &self.catalog {
            CatalogState::Loading(sync) => sync.location().clone(),
            CatalogState::Failed(location) => location.clone(),
            CatalogState::Ready(_) => return,
        };
        error!(%reason, "catalog failed to load");
        self.catalog = CatalogState::Failed(location);
        self.rendered = RenderedView::load_failed();
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.catalog, CatalogState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.catalog, CatalogState::Loading(_))
    }

    /// The shareable location for the current filters.
    pub fn location(&self) -> &Location {
        match &self.catalog {
            CatalogState::Loading(sync) => sync.location(),
            CatalogState::Failed(location) => location,
            CatalogState::Ready(session) => session.location(),
        }
    }

    pub fn rendered(&self) -> &RenderedView {
        &self.rendered
    }

    /// Re-queries with the values currently in the form.
    pub fn submit_filters(&mut self) -> Vec<Effect> {
        let state = self.browser.form_state();
        let CatalogState::Ready(session) = &mut self.catalog else {
            return Vec::new();
        };
        session.apply(state);
        self.refresh_view()
    }

    /// Resets the form and the filters, strips the location and forgets the
    /// persisted entry.
    pub fn clear_filters(&mut self) -> Vec<Effect> {
        let CatalogState::Ready(session) = &mut self.catalog else {
            return Vec::new();
        };
        session.clear();
        self.browser.load_state(session.state());
        self.refresh_view()
    }

    /// Rebuilds the display model after the view changed. The card list
    /// starts over at the top.
    fn refresh_view(&mut self) -> Vec<Effect> {
        self.rendered = match &self.catalog {
            CatalogState::Loading(_) => RenderedView::Loading,
            CatalogState::Failed(_) => RenderedView::load_failed(),
            CatalogState::Ready(session) => session.rendered(),
        };
        let cards = self.rendered.cards();
        let transition = self.cards.retain_visible(|rank| cards.iter().any(|card| card.rank == rank));
        self.browser.reset_selection(cards.len());
        self.sync_card_focus();
        match transition {
            Transition::Collapsed { card } => {
                debug!(card, "expanded card left the view");
                vec![Effect::CloseModal]
            }
            _ => Vec::new(),
        }
    }

    pub fn selected_card(&self) -> Option<&CardView> {
        self.browser.selected_index().and_then(|index| self.rendered.cards().get(index))
    }

    pub fn card(&self, rank: u32) -> Option<&CardView> {
        self.rendered.cards().iter().find(|card| card.rank == rank)
    }

    pub fn select_card(&mut self, index: usize) {
        if index < self.rendered.cards().len() {
            self.browser.list_state.select(Some(index));
        }
        self.sync_card_focus();
    }

    /// Mirrors card-list focus into the expansion controller.
    pub fn sync_card_focus(&mut self) {
        let focused_rank = if self.browser.f_cards.get() {
            self.selected_card().map(|card| card.rank)
        } else {
            None
        };
        match focused_rank {
            Some(rank) => self.cards.focus_card(rank),
            None => self.cards.blur(),
        }
    }

    /// Turns an expansion transition into navigation effects. A collapse
    /// selects the card in the list again and gives the list focus.
    pub fn apply_transition(&mut self, transition: Transition) -> Vec<Effect> {
        match transition {
            Transition::Expanded { card, replaced } => {
                if let Some(previous) = replaced {
                    debug!(previous, card, "replacing expanded card");
                }
                vec![Effect::ShowModal(Modal::CardDetail { rank: card })]
            }
            Transition::Collapsed { card } => {
                if let Some(index) = self.rendered.cards().iter().position(|view| view.rank == card) {
                    self.browser.list_state.select(Some(index));
                }
                self.focus.focus(&self.browser.f_cards);
                vec![Effect::CloseModal]
            }
            Transition::Unchanged => Vec::new(),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use marquee_engine::ActivationTarget;
    use marquee_types::Item;
    use tempfile::TempDir;

    use crate::ui::theme::DraculaTheme;

    pub(crate) fn item(rank: u32, title: &str, year: i32, genres: &[&str]) -> Item {
        Item {
            rank,
            title: title.to_string(),
            rating: 9.0,
            year,
            genres: genres.iter().map(|genre| genre.to_string()).collect(),
            synopsis: format!("About {title}."),
            creator: "Studio".to_string(),
            image_url: String::new(),
        }
    }

    pub(crate) fn test_app(dir: &TempDir, location: &str) -> App {
        let store = JsonFilterStore::new(dir.path().join("filtrosSalvos.json"));
        let sync = FilterSynchronizer::new(Location::parse(location).unwrap(), store);
        App::new(SharedCtx::new(Box::new(DraculaTheme::new()), "data.json"), sync)
    }

    pub(crate) fn catalog() -> Catalog {
        Catalog::new(vec![
            item(1, "Frieren", 2023, &["Aventura", "Fantasia"]),
            item(2, "Monster", 2004, &["Mistério"]),
            item(3, "Cowboy Bebop", 1998, &["Ação", "Ficção Científica"]),
        ])
        .unwrap()
    }

    #[test]
    fn loading_populates_form_and_cards() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "?genero=Ação");
        assert_eq!(app.rendered(), &RenderedView::Loading);

        app.update(&Msg::CatalogLoaded(catalog()));
        assert!(app.is_ready());
        assert_eq!(app.browser.genre.value(), "Ação");
        assert_eq!(app.rendered().cards().len(), 1);
        assert_eq!(app.selected_card().map(|card| card.rank), Some(3));
    }

    #[test]
    fn load_failure_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "");
        app.update(&Msg::CatalogLoadFailed("connection refused".into()));
        assert!(matches!(app.rendered(), RenderedView::LoadFailed { .. }));

        app.update(&Msg::CatalogLoaded(catalog()));
        assert!(!app.is_ready());
        assert!(app.submit_filters().is_empty());
    }

    #[test]
    fn submit_uses_form_values_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "");
        app.update(&Msg::CatalogLoaded(catalog()));
        assert!(!dir.path().join("filtrosSalvos.json").exists());

        app.browser.search.set_input("mon");
        app.submit_filters();
        assert_eq!(app.rendered().cards().iter().map(|card| card.rank).collect::<Vec<_>>(), vec![2]);
        assert_eq!(app.location().to_string(), "marquee://catalog/?q=mon");
        assert!(dir.path().join("filtrosSalvos.json").exists());
    }

    #[test]
    fn clear_resets_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "?q=monster&ordem=ano");
        app.update(&Msg::CatalogLoaded(catalog()));
        app.clear_filters();
        assert_eq!(app.browser.search.input(), "");
        assert_eq!(app.browser.order.value(), "posicao");
        assert_eq!(app.rendered().cards().len(), 3);
        assert_eq!(app.location().to_string(), "marquee://catalog/");
    }

    #[test]
    fn expanded_card_that_leaves_the_view_collapses() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "");
        app.update(&Msg::CatalogLoaded(catalog()));
        let transition = app.cards.activate(2, ActivationTarget::Body);
        assert_eq!(app.apply_transition(transition), vec![Effect::ShowModal(Modal::CardDetail { rank: 2 })]);

        app.browser.search.set_input("bebop");
        assert_eq!(app.submit_filters(), vec![Effect::CloseModal]);
        assert_eq!(app.cards.expanded(), None);
        assert!(!app.cards.overlay_visible());
    }

    #[test]
    fn collapse_reselects_card_in_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, "");
        app.update(&Msg::CatalogLoaded(catalog()));
        let transition = app.cards.activate(3, ActivationTarget::Body);
        app.apply_transition(transition);

        let transition = app.cards.activate_overlay();
        assert_eq!(app.apply_transition(transition), vec![Effect::CloseModal]);
        assert_eq!(app.selected_card().map(|card| card.rank), Some(3));
        assert!(app.browser.f_cards.get());
    }
}
