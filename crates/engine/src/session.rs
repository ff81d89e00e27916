//! Application context for a browsing session.
//!
//! `CatalogSession` owns the loaded catalog, the filter options derived
//! from it, the synchronizer and the live filter state. The query engine and
//! presentation stay free functions; the session only sequences them:
//! every change recomputes the view from the full catalog and writes the
//! state to the location and to storage.

use marquee_types::{Catalog, FilterState};
use marquee_util::FilterStore;
use tracing::{info, warn};

use crate::location::Location;
use crate::options::FilterOptions;
use crate::presentation::{RenderedView, render};
use crate::query::{DerivedView, apply};
use crate::sync::FilterSynchronizer;

#[derive(Debug)]
pub struct CatalogSession<S> {
    catalog: Catalog,
    options: FilterOptions,
    sync: FilterSynchronizer<S>,
    state: FilterState,
    view: DerivedView,
}

impl<S: FilterStore> CatalogSession<S> {
    /// Starts a session over a freshly loaded catalog.
    ///
    /// Resolves the initial state, computes the first view and normalizes
    /// the location. Storage is left untouched until the first filter action.
    pub fn start(catalog: Catalog, mut sync: FilterSynchronizer<S>) -> Self {
        let options = FilterOptions::from_catalog(&catalog);
        let state = sync.resolve_initial_state();
        let view = apply(&catalog, &state);
        sync.write_location(&state);
        info!(items = catalog.len(), visible = view.len(), "catalog session started");
        Self {
            catalog,
            options,
            sync,
            state,
            view,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn location(&self) -> &Location {
        self.sync.location()
    }

    pub fn store(&self) -> &S {
        self.sync.store()
    }

    /// Display model for the current view.
    pub fn rendered(&self) -> RenderedView {
        render(&self.catalog, &self.view)
    }

    /// Replaces the filter state, recomputes the view and persists.
    ///
    /// Applying the same state twice yields the same view and the same
    /// location and storage contents.
    pub fn apply(&mut self, state: FilterState) -> &DerivedView {
        self.state = state;
        self.view = apply(&self.catalog, &self.state);
        if let Err(error) = self.sync.persist(&self.state) {
            warn!(%error, "could not persist filters");
        }
        &self.view
    }

    /// Resets to the defaults, strips the location query and deletes the
    /// persisted entry, then recomputes. Nothing is written back to storage.
    pub fn clear(&mut self) -> &DerivedView {
        self.state = match self.sync.clear() {
            Ok(defaults) => defaults,
            Err(error) => {
                warn!(%error, "could not remove persisted filters");
                self.sync.defaults().clone()
            }
        };
        self.view = apply(&self.catalog, &self.state);
        &self.view
    }
}
