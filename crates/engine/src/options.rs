use std::collections::BTreeSet;

use marquee_types::Catalog;

/// Selectable values for the genre and year filters.
///
/// Computed once after the catalog loads; the catalog never changes
/// afterwards, so neither do the options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct genres across all items, lexicographically sorted.
    pub genres: Vec<String>,
    /// Distinct years, most recent first.
    pub years: Vec<i32>,
}

impl FilterOptions {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let genres: BTreeSet<&str> = catalog
            .items()
            .iter()
            .flat_map(|item| item.genres.iter().map(String::as_str))
            .collect();
        let years: BTreeSet<i32> = catalog.items().iter().map(|item| item.year).collect();

        Self {
            genres: genres.into_iter().map(str::to_string).collect(),
            years: years.into_iter().rev().collect(),
        }
    }

    /// Year options in the textual form used by the year filter.
    pub fn year_values(&self) -> Vec<String> {
        self.years.iter().map(i32::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_types::Item;

    fn item(rank: u32, year: i32, genres: &[&str]) -> Item {
        Item {
            rank,
            title: format!("#{rank}"),
            rating: 7.0,
            year,
            genres: genres.iter().map(|genre| genre.to_string()).collect(),
            synopsis: String::new(),
            creator: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let catalog = Catalog::new(vec![
            item(1, 2019, &["Drama", "Ação"]),
            item(2, 2023, &["Ação", "Comédia"]),
            item(3, 2019, &["Drama"]),
        ])
        .unwrap();
        let options = FilterOptions::from_catalog(&catalog);
        assert_eq!(options.genres, vec!["Ação", "Comédia", "Drama"]);
        assert_eq!(options.years, vec![2023, 2019]);
        assert_eq!(options.year_values(), vec!["2023".to_string(), "2019".to_string()]);
    }

    #[test]
    fn empty_catalog_has_no_options() {
        let options = FilterOptions::from_catalog(&Catalog::default());
        assert!(options.genres.is_empty());
        assert!(options.years.is_empty());
    }
}
