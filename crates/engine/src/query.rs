//! Query engine: turns the catalog and a filter state into the ordered view.
//!
//! `apply` is pure and total. Each predicate is an independent conjunction,
//! so evaluation order only affects the work done, never the result. The
//! final sort is stable: ties keep catalog order.

use marquee_types::{Catalog, FilterState, Item, SortOrder};

use crate::collation::compare_titles;

/// Ordered subsequence of the catalog matching a filter state.
///
/// Stores catalog indices so the view can be held next to the catalog it
/// was derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedView {
    indices: Vec<usize>,
}

impl DerivedView {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Items of the view, in view order.
    pub fn items<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Item> + 'a {
        self.indices.iter().filter_map(move |&index| catalog.get(index))
    }

    /// Ranks of the view, in view order.
    pub fn ranks(&self, catalog: &Catalog) -> Vec<u32> {
        self.items(catalog).map(|item| item.rank).collect()
    }

    pub fn contains_rank(&self, catalog: &Catalog, rank: u32) -> bool {
        self.items(catalog).any(|item| item.rank == rank)
    }
}

/// Computes the derived view. Always recomputed from the full catalog.
pub fn apply(catalog: &Catalog, state: &FilterState) -> DerivedView {
    let items = catalog.items();
    let needle = state.query.to_lowercase();

    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_query(item, &needle))
        .filter(|(_, item)| matches_genre(item, &state.genre))
        .filter(|(_, item)| year_matches(&state.year, item.year))
        .map(|(index, _)| index)
        .collect();

    match state.order {
        SortOrder::Title => indices.sort_by(|&a, &b| compare_titles(&items[a].title, &items[b].title)),
        SortOrder::Year => indices.sort_by(|&a, &b| items[b].year.cmp(&items[a].year)),
        SortOrder::Rank => indices.sort_by_key(|&index| items[index].rank),
    }

    DerivedView { indices }
}

/// Case-insensitive substring match against the title. `needle` must
/// already be lowercase; an empty needle matches everything.
fn matches_query(item: &Item, needle: &str) -> bool {
    needle.is_empty() || item.title.to_lowercase().contains(needle)
}

/// Exact, case-sensitive element match. Empty selection matches everything.
fn matches_genre(item: &Item, genre: &str) -> bool {
    genre.is_empty() || item.genres.iter().any(|candidate| candidate == genre)
}

/// Compares the textual year filter with a numeric item year.
///
/// An empty filter matches every year. Otherwise the trimmed filter must
/// parse as a finite number equal to the year, so `"2020"`, `" 2020 "`
/// and `"2020.0"` all match 2020 while `"20x0"` matches nothing.
pub fn year_matches(filter: &str, year: i32) -> bool {
    if filter.is_empty() {
        return true;
    }
    filter
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .is_some_and(|value| value == f64::from(year))
}
