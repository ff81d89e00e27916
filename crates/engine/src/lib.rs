//! # marquee engine
//!
//! Framework-independent core of the catalog browser:
//!
//! - [`query`]: filters and orders the catalog for a filter state
//! - [`options`]: genre and year choices derived from the catalog
//! - [`location`] and [`sync`]: the shareable location, durable storage and
//!   how the starting state is chosen between them
//! - [`session`]: the application context tying the above together
//! - [`presentation`]: the display model for the card area
//! - [`interaction`]: the expand/collapse state machine for cards

pub mod collation;
pub mod interaction;
pub mod location;
pub mod options;
pub mod presentation;
pub mod query;
pub mod session;
pub mod sync;

pub use interaction::{ActivationTarget, CardKey, CardState, ExpansionController, FocusTarget, KeyOutcome, Transition};
pub use location::{Location, LocationError};
pub use options::FilterOptions;
pub use presentation::{CardView, RenderedView, STREAMING_LINK_LABEL, render, streaming_search_url};
pub use query::{DerivedView, apply, year_matches};
pub use session::CatalogSession;
pub use sync::{FilterSynchronizer, resolve_initial_state, state_to_params};
