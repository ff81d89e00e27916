use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter names shared by the location query string and the persisted entry.
pub mod keys {
    pub const QUERY: &str = "q";
    pub const GENRE: &str = "genero";
    pub const YEAR: &str = "ano";
    pub const ORDER: &str = "ordem";

    /// Every recognized key, in serialization order.
    pub const ALL: [&str; 4] = [QUERY, GENRE, YEAR, ORDER];
}

/// Ordering applied to the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Ascending by rank.
    #[default]
    Rank,
    /// Collated title order.
    Title,
    /// Descending by year.
    Year,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Rank, SortOrder::Title, SortOrder::Year];

    /// Wire value used in the location and the persisted entry.
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Rank => "posicao",
            SortOrder::Title => "titulo",
            SortOrder::Year => "ano",
        }
    }

    /// Parses a wire value. Anything unrecognized, including an empty
    /// string, resolves to rank order.
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "titulo" => SortOrder::Title,
            "ano" => SortOrder::Year,
            _ => SortOrder::Rank,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Rank => "Rank",
            SortOrder::Title => "Title (A-Z)",
            SortOrder::Year => "Year (newest)",
        }
    }
}

/// The user's current search, filter and sort selection.
///
/// Empty strings mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub query: String,
    pub genre: String,
    pub year: String,
    pub order: SortOrder,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }
}

/// Serialized form of the complete filter set kept in durable storage.
///
/// All four keys are always written, including defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedFilters {
    pub q: String,
    pub genero: String,
    pub ano: String,
    pub ordem: String,
}

impl PersistedFilters {
    /// Reads the entry from an already-parsed JSON object.
    ///
    /// Keys that are missing or hold a non-string value read as empty and
    /// later fall back to their defaults.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let read = |key: &str| object.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        Self {
            q: read(keys::QUERY),
            genero: read(keys::GENRE),
            ano: read(keys::YEAR),
            ordem: read(keys::ORDER),
        }
    }

    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            query: self.q.clone(),
            genre: self.genero.clone(),
            year: self.ano.clone(),
            order: SortOrder::from_param(&self.ordem),
        }
    }
}

impl From<&FilterState> for PersistedFilters {
    fn from(state: &FilterState) -> Self {
        Self {
            q: state.query.clone(),
            genero: state.genre.clone(),
            ano: state.year.clone(),
            ordem: state.order.as_param().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_order_params_resolve_to_rank() {
        assert_eq!(SortOrder::from_param("titulo"), SortOrder::Title);
        assert_eq!(SortOrder::from_param("ano"), SortOrder::Year);
        assert_eq!(SortOrder::from_param(""), SortOrder::Rank);
        assert_eq!(SortOrder::from_param("nota"), SortOrder::Rank);
    }

    #[test]
    fn persisted_entry_always_carries_order() {
        let entry = PersistedFilters::from(&FilterState::default());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"q": "", "genero": "", "ano": "", "ordem": "posicao"}));
    }

    #[test]
    fn persisted_entry_reads_per_key_with_fallback() {
        let value = json!({"q": "naruto", "ano": 2002, "ordem": "ano"});
        let entry = PersistedFilters::from_object(value.as_object().unwrap());
        let state = entry.to_filter_state();
        assert_eq!(state.query, "naruto");
        assert_eq!(state.genre, "");
        assert_eq!(state.year, "");
        assert_eq!(state.order, SortOrder::Year);
    }
}
