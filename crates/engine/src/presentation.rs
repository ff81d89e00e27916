//! Display model for the card area.
//!
//! `render` turns a derived view into what the card area shows. An empty
//! view is its own state with a single "no results" message, never an
//! empty list of cards.

use marquee_types::{Catalog, Item};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::query::DerivedView;

/// Search endpoint the streaming link points at; the encoded title is appended.
pub const STREAMING_SEARCH_URL: &str = "https://www.justwatch.com/br/busca?q=";

/// Label of the streaming link on every card.
pub const STREAMING_LINK_LABEL: &str = "Where to watch?";

pub const LOADING_MESSAGE: &str = "Loading catalog...";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load the catalog. Try restarting marquee.";
pub const NO_RESULTS_MESSAGE: &str = "No titles match the selected filters.";

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Title used for the streaming search: everything before the first `(`,
/// trimmed.
pub fn streaming_search_title(title: &str) -> &str {
    title.split('(').next().unwrap_or(title).trim()
}

pub fn streaming_search_url(title: &str) -> String {
    let encoded = utf8_percent_encode(streaming_search_title(title), URI_COMPONENT);
    format!("{STREAMING_SEARCH_URL}{encoded}")
}

/// Everything a card shows, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub rank: u32,
    /// `"<rank>. <title>"`
    pub heading: String,
    pub rating: String,
    pub year: i32,
    /// Genres joined with `", "`.
    pub genres: String,
    pub synopsis: String,
    pub creator: String,
    pub image_url: String,
    pub streaming_url: String,
}

impl From<&Item> for CardView {
    fn from(item: &Item) -> Self {
        Self {
            rank: item.rank,
            heading: format!("{}. {}", item.rank, item.title),
            rating: item.rating.to_string(),
            year: item.year,
            genres: item.genres.join(", "),
            synopsis: item.synopsis.clone(),
            creator: item.creator.clone(),
            image_url: item.image_url.clone(),
            streaming_url: streaming_search_url(&item.title),
        }
    }
}

/// What the card area displays.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    /// The catalog fetch has not completed.
    Loading,
    /// The catalog fetch failed; terminal for the session.
    LoadFailed { message: String },
    /// The view is empty.
    NoResults { message: String },
    /// One card per item, in view order.
    Cards(Vec<CardView>),
}

impl RenderedView {
    pub fn load_failed() -> Self {
        RenderedView::LoadFailed {
            message: LOAD_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn cards(&self) -> &[CardView] {
        match self {
            RenderedView::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// The single status message shown instead of cards, if any.
    pub fn indicator(&self) -> Option<&str> {
        match self {
            RenderedView::Loading => Some(LOADING_MESSAGE),
            RenderedView::LoadFailed { message } | RenderedView::NoResults { message } => Some(message.as_str()),
            RenderedView::Cards(_) => None,
        }
    }
}

/// Builds the display model for a view. Replaces whatever was shown before.
pub fn render(catalog: &Catalog, view: &DerivedView) -> RenderedView {
    if view.is_empty() {
        return RenderedView::NoResults {
            message: NO_RESULTS_MESSAGE.to_string(),
        };
    }
    RenderedView::Cards(view.items(catalog).map(CardView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_url_drops_parenthesized_suffix() {
        assert_eq!(
            streaming_search_url("Gintama (2015)"),
            "https://www.justwatch.com/br/busca?q=Gintama"
        );
        assert_eq!(
            streaming_search_url("Fullmetal Alchemist: Brotherhood"),
            "https://www.justwatch.com/br/busca?q=Fullmetal%20Alchemist%3A%20Brotherhood"
        );
    }

    #[test]
    fn streaming_url_encodes_like_uri_components() {
        assert_eq!(
            streaming_search_url("Kaguya-sama: Love is War!"),
            "https://www.justwatch.com/br/busca?q=Kaguya-sama%3A%20Love%20is%20War!"
        );
        assert_eq!(streaming_search_url("Ação & Co"), "https://www.justwatch.com/br/busca?q=A%C3%A7%C3%A3o%20%26%20Co");
    }

    #[test]
    fn card_formats_fields() {
        let item = Item {
            rank: 7,
            title: "Hunter x Hunter (2011)".into(),
            rating: 9.0,
            year: 2011,
            genres: vec!["Ação".into(), "Aventura".into()],
            synopsis: "Gon parte...".into(),
            creator: "Madhouse".into(),
            image_url: "https://example.com/hxh.jpg".into(),
        };
        let card = CardView::from(&item);
        assert_eq!(card.heading, "7. Hunter x Hunter (2011)");
        assert_eq!(card.rating, "9");
        assert_eq!(card.genres, "Ação, Aventura");
        assert_eq!(card.streaming_url, "https://www.justwatch.com/br/busca?q=Hunter%20x%20Hunter");
    }

    #[test]
    fn empty_view_renders_single_indicator() {
        let rendered = render(&Catalog::default(), &DerivedView::default());
        assert!(rendered.cards().is_empty());
        assert_eq!(rendered.indicator(), Some(NO_RESULTS_MESSAGE));
    }
}
