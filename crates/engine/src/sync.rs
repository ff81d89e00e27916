//! Filter state synchronization between the location, durable storage and
//! the live filter state.
//!
//! Resolution on start: a location carrying any recognized key fully
//! determines the state; otherwise a persisted entry does; otherwise the
//! defaults apply. In both non-default cases a missing or empty key falls
//! back to that key's default, never to the other source.
//!
//! After every recomputation the state is written to both sinks: the
//! location (non-default fields only, replaced in place) and storage (all
//! fields, `ordem` included even at its default).

use marquee_types::{FilterState, PersistedFilters, SortOrder, keys};
use marquee_util::{FilterStore, FilterStoreError};
use tracing::{debug, warn};

use crate::location::Location;

/// Location parameters for a state, in serialization order. Empty fields
/// and rank order are omitted.
pub fn state_to_params(state: &FilterState) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(keys::ALL.len());
    for (key, value) in [
        (keys::QUERY, state.query.as_str()),
        (keys::GENRE, state.genre.as_str()),
        (keys::YEAR, state.year.as_str()),
    ] {
        if !value.is_empty() {
            params.push((key.to_string(), value.to_string()));
        }
    }
    if state.order != SortOrder::Rank {
        params.push((keys::ORDER.to_string(), state.order.as_param().to_string()));
    }
    params
}

/// Picks the starting filter state from the location, then the persisted
/// entry, then `defaults`.
pub fn resolve_initial_state(
    location: &Location,
    persisted: Option<&PersistedFilters>,
    defaults: &FilterState,
) -> FilterState {
    if location.has_any(&keys::ALL) {
        debug!(%location, "filters resolved from location");
        let read = |key: &str| location.param(key).unwrap_or_default();
        return with_defaults(read(keys::QUERY), read(keys::GENRE), read(keys::YEAR), read(keys::ORDER), defaults);
    }
    if let Some(entry) = persisted {
        debug!("filters resolved from persisted entry");
        return with_defaults(&entry.q, &entry.genero, &entry.ano, &entry.ordem, defaults);
    }
    debug!("filters resolved from defaults");
    defaults.clone()
}

fn with_defaults(query: &str, genre: &str, year: &str, order: &str, defaults: &FilterState) -> FilterState {
    let or_default = |value: &str, fallback: &String| {
        if value.is_empty() {
            fallback.clone()
        } else {
            value.to_string()
        }
    };
    FilterState {
        query: or_default(query, &defaults.query),
        genre: or_default(genre, &defaults.genre),
        year: or_default(year, &defaults.year),
        order: if order.is_empty() {
            defaults.order
        } else {
            SortOrder::from_param(order)
        },
    }
}

/// Owns the location and the durable store and keeps both in step with the
/// live filter state.
#[derive(Debug)]
pub struct FilterSynchronizer<S> {
    location: Location,
    store: S,
    defaults: FilterState,
}

impl<S: FilterStore> FilterSynchronizer<S> {
    pub fn new(location: Location, store: S) -> Self {
        Self {
            location,
            store,
            defaults: FilterState::default(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    /// Resolves the starting state. Storage problems are logged and read
    /// as "no persisted entry".
    pub fn resolve_initial_state(&self) -> FilterState {
        let persisted = if self.location.has_any(&keys::ALL) {
            None
        } else {
            match self.store.load() {
                Ok(entry) => entry,
                Err(FilterStoreError::Malformed(reason)) => {
                    warn!(%reason, "ignoring malformed persisted filters");
                    None
                }
                Err(error) => {
                    warn!(%error, "could not read persisted filters");
                    None
                }
            }
        };
        resolve_initial_state(&self.location, persisted.as_ref(), &self.defaults)
    }

    /// Rewrites the location in place.
    pub fn write_location(&mut self, state: &FilterState) {
        self.location.replace_params(state_to_params(state));
    }

    /// Writes the state to both sinks.
    pub fn persist(&mut self, state: &FilterState) -> Result<(), FilterStoreError> {
        self.write_location(state);
        self.store.save(&PersistedFilters::from(state))
    }

    /// Strips the location query and deletes the persisted entry. Returns the
    /// defaults to continue with.
    pub fn clear(&mut self) -> Result<FilterState, FilterStoreError> {
        self.location.clear_params();
        self.store.remove()?;
        Ok(self.defaults.clone())
    }
}
