//! UI components: the catalog browser and the card detail modal.

pub mod browser;
pub mod card_detail;
pub mod common;
pub mod component;

pub use browser::BrowserComponent;
pub use card_detail::CardDetailComponent;
pub use component::*;
