use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the catalog from its data source.
///
/// Any variant is terminal for the session: the card area shows a static
/// error message and the load is not retried.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The local catalog file could not be read.
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The remote catalog could not be fetched.
    #[error("failed to fetch catalog from {url}: {message}")]
    Fetch { url: String, message: String },
    /// The remote catalog answered with a non-success status.
    #[error("catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The payload is not a catalog document.
    #[error("malformed catalog payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two records share the same rank.
    #[error("catalog contains duplicate rank {0}")]
    DuplicateRank(u32),
}
