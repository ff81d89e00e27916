use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// A single browsable catalog entry.
///
/// Field names on the wire follow the published catalog document
/// (`posicao`, `titulo`, ...); English aliases are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Position in the ranking. Unique across the catalog.
    #[serde(rename = "posicao", alias = "rank")]
    pub rank: u32,
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "nota", alias = "rating")]
    pub rating: f64,
    #[serde(rename = "ano", alias = "year")]
    pub year: i32,
    #[serde(rename = "genero", alias = "genres", default)]
    pub genres: Vec<String>,
    #[serde(rename = "sinopse", alias = "synopsis", default)]
    pub synopsis: String,
    #[serde(rename = "criador_original", alias = "creator", default)]
    pub creator: String,
    #[serde(rename = "imagem_url", alias = "image_url", default)]
    pub image_url: String,
}

/// Top-level shape of the catalog data source.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    #[serde(rename = "top_rated_anime", alias = "items")]
    pub items: Vec<Item>,
}

/// Immutable, ordered list of items loaded once at startup.
///
/// Cloning is cheap; all clones share the same backing slice.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Arc<[Item]>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ranks.
    pub fn new(items: Vec<Item>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.rank)) {
            return Err(LoadError::DuplicateRank(duplicate.rank));
        }
        Ok(Self { items: items.into() })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Finds the catalog index of the item with the given rank.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = LoadError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        Catalog::new(document.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rank: u32) -> Item {
        Item {
            rank,
            title: format!("Title {rank}"),
            rating: 8.0,
            year: 2000,
            genres: vec![],
            synopsis: String::new(),
            creator: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn document_accepts_published_field_names() {
        let raw = r#"{
            "top_rated_anime": [
                {
                    "posicao": 1,
                    "titulo": "Fullmetal Alchemist: Brotherhood",
                    "nota": 9.1,
                    "ano": 2009,
                    "genero": ["Ação", "Aventura"],
                    "sinopse": "Dois irmãos...",
                    "criador_original": "Bones",
                    "imagem_url": "https://example.com/fma.jpg"
                }
            ]
        }"#;
        let document: CatalogDocument = serde_json::from_str(raw).unwrap();
        let catalog = Catalog::try_from(document).unwrap();
        assert_eq!(catalog.len(), 1);
        let first = &catalog.items()[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.year, 2009);
        assert_eq!(first.genres, vec!["Ação".to_string(), "Aventura".to_string()]);
        assert_eq!(first.creator, "Bones");
    }

    #[test]
    fn document_accepts_english_aliases() {
        let raw = r#"{"items": [{"rank": 3, "title": "Mushishi", "rating": 8.6, "year": 2005, "genres": ["Mistério"]}]}"#;
        let document: CatalogDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(document.items[0].title, "Mushishi");
        assert!(document.items[0].synopsis.is_empty());
    }

    #[test]
    fn duplicate_ranks_are_rejected() {
        let error = Catalog::new(vec![item(1), item(2), item(1)]).unwrap_err();
        assert!(matches!(error, LoadError::DuplicateRank(1)));
    }
}
