//! Storage, loading and configuration helpers shared by the marquee crates.

pub mod catalog_source;
pub mod config;
pub mod filter_store;

pub use catalog_source::{CatalogSource, parse_catalog};
pub use config::{ConfigOverrides, MarqueeConfig, expand_tilde};
pub use filter_store::{FILTERS_ENTRY_NAME, FilterStore, FilterStoreError, InMemoryFilterStore, JsonFilterStore};
