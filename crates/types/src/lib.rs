//! Shared type definitions for marquee: catalog records, filter state,
//! load errors and the message/effect vocabulary used by the TUI.

pub mod errors;
pub mod filter;
pub mod item;
pub mod messages;

pub use errors::LoadError;
pub use filter::{FilterState, PersistedFilters, SortOrder, keys};
pub use item::{Catalog, CatalogDocument, Item};
pub use messages::{Effect, Modal, Msg};
