//! Locale-style title collation.
//!
//! Titles compare with the Unicode Collation Algorithm using the root
//! locale at tertiary strength: base letters first (accents folded, case
//! ignored, whitespace < punctuation < symbols < digits < letters), then
//! accents, then case with lowercase first.

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use tracing::warn;

static TITLE_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(error) => {
            warn!(%error, "title collator unavailable; falling back to case-folded order");
            None
        }
    }
});

/// Compares two titles the way a locale-aware string comparison would.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    match TITLE_COLLATOR.as_ref() {
        Some(collator) => collator.compare(left, right),
        None => left.to_lowercase().cmp(&right.to_lowercase()).then_with(|| right.cmp(left)),
    }
}
