use marquee_engine::{
    ActivationTarget, CardKey, CatalogSession, ExpansionController, FilterSynchronizer, FocusTarget, Location,
    RenderedView, apply, render, resolve_initial_state, state_to_params,
};
use marquee_types::{Catalog, FilterState, Item, SortOrder};
use marquee_util::{FilterStore, InMemoryFilterStore, JsonFilterStore};
use tempfile::tempdir;

fn item(rank: u32, title: &str, year: i32, genres: &[&str]) -> Item {
    Item {
        rank,
        title: title.to_string(),
        rating: 8.0 + f64::from(rank) / 10.0,
        year,
        genres: genres.iter().map(|genre| genre.to_string()).collect(),
        synopsis: format!("Synopsis of {title}"),
        creator: "Studio".to_string(),
        image_url: format!("https://example.com/{rank}.jpg"),
    }
}

/// Deliberately out of rank order so sorting is observable.
fn catalog() -> Catalog {
    Catalog::new(vec![
        item(5, "naruto", 2002, &["Ação", "Aventura"]),
        item(2, "Death Note", 2006, &["Mistério", "Suspense"]),
        item(1, "Fullmetal Alchemist: Brotherhood", 2009, &["Ação", "Fantasia"]),
        item(4, "Ergo Proxy", 2006, &["Ficção Científica", "Mistério"]),
        item(3, "Akira (1988)", 1988, &["Ficção Científica"]),
        item(6, "Naruto", 2002, &["Ação"]),
    ])
    .unwrap()
}

fn with_order(order: SortOrder) -> FilterState {
    FilterState {
        order,
        ..Default::default()
    }
}

#[test]
fn default_state_returns_whole_catalog_by_rank() {
    let catalog = catalog();
    let view = apply(&catalog, &FilterState::default());
    assert_eq!(view.ranks(&catalog), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn filtering_by_an_items_genre_always_includes_it() {
    let catalog = catalog();
    for item in catalog.items() {
        for genre in &item.genres {
            let state = FilterState {
                genre: genre.clone(),
                ..Default::default()
            };
            assert!(apply(&catalog, &state).contains_rank(&catalog, item.rank), "{genre} should include {}", item.rank);
        }
    }
    let state = FilterState {
        genre: "Esporte".into(),
        ..Default::default()
    };
    assert!(apply(&catalog, &state).is_empty());
}

#[test]
fn title_order_ignores_case_and_keeps_ties_stable() {
    let catalog = catalog();
    let view = apply(&catalog, &with_order(SortOrder::Title));
    // "naruto" (5) and "Naruto" (6) share a primary key; lowercase sorts first
    assert_eq!(view.ranks(&catalog), vec![3, 2, 4, 1, 5, 6]);
}

#[test]
fn year_order_keeps_catalog_order_for_equal_years() {
    let catalog = catalog();
    let view = apply(&catalog, &with_order(SortOrder::Year));
    assert_eq!(view.ranks(&catalog), vec![1, 2, 4, 5, 6, 3]);
}

#[test]
fn location_round_trip_reproduces_state() {
    let states = [
        FilterState {
            query: "alchemist & co".into(),
            genre: "Ficção Científica".into(),
            year: "2006".into(),
            order: SortOrder::Title,
        },
        FilterState {
            query: "x".into(),
            ..Default::default()
        },
        with_order(SortOrder::Year),
    ];
    for state in states {
        let mut location = Location::default();
        location.replace_params(state_to_params(&state));
        let reparsed = Location::parse(&location.to_string()).unwrap();
        assert_eq!(resolve_initial_state(&reparsed, None, &FilterState::default()), state);
    }

    let mut location = Location::default();
    location.replace_params(state_to_params(&FilterState {
        genre: "Ação".into(),
        ..Default::default()
    }));
    assert!(location.param("ordem").is_none());
    let reparsed = Location::parse(&location.to_string()).unwrap();
    assert_eq!(resolve_initial_state(&reparsed, None, &FilterState::default()).order, SortOrder::Rank);
}

#[test]
fn clearing_resets_state_location_and_storage() {
    let mut session = CatalogSession::start(
        catalog(),
        FilterSynchronizer::new(Location::parse("/browse?q=naruto").unwrap(), InMemoryFilterStore::new()),
    );
    session.apply(FilterState {
        query: "naruto".into(),
        genre: "Ação".into(),
        year: "2002".into(),
        order: SortOrder::Title,
    });
    assert!(session.store().raw().is_some());

    session.clear();
    assert_eq!(
        *session.state(),
        FilterState {
            query: String::new(),
            genre: String::new(),
            year: String::new(),
            order: SortOrder::Rank,
        }
    );
    assert_eq!(session.location().to_string(), "marquee://catalog/browse");
    assert!(session.store().raw().is_none());
    assert_eq!(session.view().len(), 6);
}

#[test]
fn year_filter_keeps_rank_order_of_matches() {
    let catalog = Catalog::new(vec![item(1, "A", 2020, &[]), item(2, "B", 2019, &[]), item(3, "C", 2020, &[])]).unwrap();
    let state = FilterState {
        year: "2020".into(),
        ..Default::default()
    };
    assert_eq!(apply(&catalog, &state).ranks(&catalog), vec![1, 3]);
}

#[test]
fn escape_collapses_and_returns_focus_to_card() {
    let mut controller = ExpansionController::new();
    controller.focus_card(2);
    controller.key(Some(2), CardKey::Enter);
    assert_eq!(controller.expanded(), Some(2));

    controller.key(None, CardKey::Escape);
    assert_eq!(controller.expanded(), None);
    assert!(!controller.overlay_visible());
    assert!(!controller.scroll_locked());
    assert_eq!(controller.focus(), Some(FocusTarget::CardRoot(2)));
}

#[test]
fn streaming_link_never_changes_expansion() {
    let mut controller = ExpansionController::new();
    controller.activate(1, ActivationTarget::StreamingLink);
    assert_eq!(controller.expanded(), None);

    controller.activate(1, ActivationTarget::Body);
    controller.activate(1, ActivationTarget::StreamingLink);
    assert_eq!(controller.expanded(), Some(1));
    assert!(controller.is_consistent());
}

#[test]
fn empty_view_renders_one_indicator_and_no_cards() {
    let catalog = catalog();
    let state = FilterState {
        query: "zzz".into(),
        ..Default::default()
    };
    let rendered = render(&catalog, &apply(&catalog, &state));
    assert!(matches!(rendered, RenderedView::NoResults { .. }));
    assert_eq!(rendered.cards().len(), 0);
    assert!(rendered.indicator().is_some());
}

#[test]
fn location_takes_priority_over_persisted_entry() {
    let store = InMemoryFilterStore::with_raw(r#"{"q":"death","genero":"","ano":"","ordem":"ano"}"#);
    let session = CatalogSession::start(catalog(), FilterSynchronizer::new(Location::parse("?ano=2002").unwrap(), store));
    assert_eq!(session.state().query, "");
    assert_eq!(session.state().order, SortOrder::Rank);
    assert_eq!(session.view().ranks(session.catalog()), vec![5, 6]);
}

#[test]
fn persisted_entry_is_used_without_location_params() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("filtrosSalvos.json");
    std::fs::write(&path, r#"{"q":"death","genero":"","ano":"","ordem":"ano"}"#).unwrap();

    let session = CatalogSession::start(catalog(), FilterSynchronizer::new(Location::default(), JsonFilterStore::new(&path)));
    assert_eq!(session.state().query, "death");
    assert_eq!(session.state().order, SortOrder::Year);
    assert_eq!(session.location().to_string(), "marquee://catalog/?q=death&ordem=ano");
}

#[test]
fn storage_stays_empty_until_first_filter_action() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("filtrosSalvos.json");
    let mut session = CatalogSession::start(catalog(), FilterSynchronizer::new(Location::default(), JsonFilterStore::new(&path)));
    assert!(!path.exists());

    session.apply(with_order(SortOrder::Year));
    assert!(path.exists());
    let stored = session.store().load().unwrap().unwrap();
    assert_eq!(stored.ordem, "ano");
}

#[test]
fn reapplying_the_same_state_is_idempotent() {
    let mut session = CatalogSession::start(catalog(), FilterSynchronizer::new(Location::default(), InMemoryFilterStore::new()));
    let state = FilterState {
        genre: "Mistério".into(),
        order: SortOrder::Title,
        ..Default::default()
    };
    let first_view = session.apply(state.clone()).clone();
    let first_location = session.location().to_string();
    let first_raw = session.store().raw();

    let second_view = session.apply(state).clone();
    assert_eq!(first_view, second_view);
    assert_eq!(first_location, session.location().to_string());
    assert_eq!(first_raw, session.store().raw());
}

#[test]
fn malformed_persisted_entry_falls_back_to_defaults() {
    let session = CatalogSession::start(
        catalog(),
        FilterSynchronizer::new(Location::default(), InMemoryFilterStore::with_raw("[\"not\", \"an object\"]")),
    );
    assert!(session.state().is_default());
    assert_eq!(session.view().len(), 6);
}
