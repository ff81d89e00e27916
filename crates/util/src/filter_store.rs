//! Durable storage for the last-used filter set.
//!
//! The store holds exactly one named entry, `filtrosSalvos`, containing the
//! complete filter set as a JSON object. The JSON-backed implementation keeps
//! the entry in its own file under the marquee config directory; the
//! in-memory implementation backs tests and read-only runs.
//!
//! Persisted data is advisory. Callers treat [`FilterStoreError::Malformed`]
//! as "no entry" rather than failing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use marquee_types::PersistedFilters;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Name of the single persisted entry.
pub const FILTERS_ENTRY_NAME: &str = "filtrosSalvos";

/// Errors surfaced by filter store operations.
#[derive(Debug, Error)]
pub enum FilterStoreError {
    /// I/O failure while reading, writing or removing the entry.
    #[error("filter store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure while writing the entry.
    #[error("filter store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The entry exists but is not valid JSON or not an object.
    #[error("persisted filters are malformed: {0}")]
    Malformed(String),
}

/// Abstraction over the durable filter entry.
pub trait FilterStore {
    /// Reads the entry. `Ok(None)` when no entry exists.
    fn load(&self) -> Result<Option<PersistedFilters>, FilterStoreError>;

    /// Replaces the entry with the given filter set.
    fn save(&self, filters: &PersistedFilters) -> Result<(), FilterStoreError>;

    /// Deletes the entry. Removing a missing entry is not an error.
    fn remove(&self) -> Result<(), FilterStoreError>;
}

/// Parses the raw text of an entry.
///
/// A JSON `null` reads as no entry; anything that is not a JSON object is
/// reported as malformed.
pub fn parse_entry(raw: &str) -> Result<Option<PersistedFilters>, FilterStoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|error| FilterStoreError::Malformed(error.to_string()))?;
    match value {
        Value::Null => Ok(None),
        Value::Object(object) => Ok(Some(PersistedFilters::from_object(&object))),
        other => Err(FilterStoreError::Malformed(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// File-backed store. The file is the entry: absent file, absent entry.
#[derive(Debug, Clone)]
pub struct JsonFilterStore {
    path: PathBuf,
}

impl JsonFilterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FilterStore for JsonFilterStore {
    fn load(&self) -> Result<Option<PersistedFilters>, FilterStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_entry(&raw),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted filters");
                Ok(None)
            }
            Err(error) => Err(FilterStoreError::Io(error)),
        }
    }

    fn save(&self, filters: &PersistedFilters) -> Result<(), FilterStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(filters)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), FilterStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(FilterStoreError::Io(error)),
        }
    }
}

/// In-memory store holding the raw entry text, the way browser storage does.
#[derive(Debug, Default)]
pub struct InMemoryFilterStore {
    raw: Mutex<Option<String>>,
}

impl InMemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with arbitrary entry text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw entry text, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl FilterStore for InMemoryFilterStore {
    fn load(&self) -> Result<Option<PersistedFilters>, FilterStoreError> {
        match self.raw().as_deref() {
            Some(raw) => parse_entry(raw),
            None => Ok(None),
        }
    }

    fn save(&self, filters: &PersistedFilters) -> Result<(), FilterStoreError> {
        let data = serde_json::to_string(filters)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(data);
        Ok(())
    }

    fn remove(&self) -> Result<(), FilterStoreError> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

impl<S: FilterStore + ?Sized> FilterStore for Box<S> {
    fn load(&self) -> Result<Option<PersistedFilters>, FilterStoreError> {
        (**self).load()
    }

    fn save(&self, filters: &PersistedFilters) -> Result<(), FilterStoreError> {
        (**self).save(filters)
    }

    fn remove(&self) -> Result<(), FilterStoreError> {
        (**self).remove()
    }
}
