//! Loading the catalog from its data source.
//!
//! A source is either a local JSON file or an `http(s)` URL fetched once with
//! an unauthenticated GET. There is no retry: a failed load is terminal.

use std::fmt;
use std::path::PathBuf;

use marquee_types::{Catalog, CatalogDocument, LoadError};
use tracing::{debug, info};
use url::Url;

use crate::config::expand_tilde;

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Remote(Url),
}

impl CatalogSource {
    /// Interprets a user-supplied source. `http://` and `https://` values
    /// that parse as URLs are remote; everything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let looks_remote = trimmed.starts_with("http://") || trimmed.starts_with("https://");
        match Url::parse(trimmed) {
            Ok(url) if looks_remote => CatalogSource::Remote(url),
            _ => CatalogSource::File(expand_tilde(trimmed)),
        }
    }

    /// Fetches and parses the catalog.
    pub async fn load(&self) -> Result<Catalog, LoadError> {
        let raw = match self {
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?,
            CatalogSource::Remote(url) => fetch_remote(url).await?,
        };
        debug!(source = %self, bytes = raw.len(), "catalog payload received");
        let catalog = parse_catalog(&raw)?;
        info!(source = %self, items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

async fn fetch_remote(url: &Url) -> Result<String, LoadError> {
    let fetch_error = |error: reqwest::Error| LoadError::Fetch {
        url: url.to_string(),
        message: error.to_string(),
    };
    let client = reqwest::Client::builder()
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_error)?;
    let response = client.get(url.clone()).send().await.map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(fetch_error)
}

/// Parses a catalog document.
pub fn parse_catalog(raw: &str) -> Result<Catalog, LoadError> {
    let document: CatalogDocument = serde_json::from_str(raw)?;
    Catalog::try_from(document)
}
