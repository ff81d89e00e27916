//! Shareable location: the terminal counterpart of the page URL.
//!
//! A location is an origin, a path and an ordered list of query
//! parameters. It accepts a full URL, `/path?query` or a bare `?query`, and
//! renders back to a full URL that can be passed to `--location`.

use std::fmt;

use thiserror::Error;
use url::{Position, Url, form_urlencoded};

/// Origin used when a location carries none.
pub const DEFAULT_ORIGIN: &str = "marquee://catalog";

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("invalid location: {0}")]
    Invalid(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    origin: String,
    path: String,
    params: Vec<(String, String)>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            path: "/".to_string(),
            params: Vec::new(),
        }
    }
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        if input.contains("://") {
            let url = Url::parse(input)?;
            let path = match url.path() {
                "" => "/".to_string(),
                path => path.to_string(),
            };
            return Ok(Self {
                origin: url[..Position::BeforePath].to_string(),
                path,
                params: url.query_pairs().into_owned().collect(),
            });
        }

        let without_fragment = input.split('#').next().unwrap_or_default();
        let (path, query) = without_fragment.split_once('?').unwrap_or((without_fragment, ""));
        Ok(Self {
            origin: DEFAULT_ORIGIN.to_string(),
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            params: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value for `key`, like `URLSearchParams::get`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    /// True when any of `keys` is present, even with an empty value.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        self.params.iter().any(|(name, _)| keys.contains(&name.as_str()))
    }

    /// Replaces the query in place, keeping origin and path.
    pub fn replace_params(&mut self, params: Vec<(String, String)>) {
        self.params = params;
    }

    /// Strips the whole query, keeping origin and path.
    pub fn clear_params(&mut self) {
        self.params.clear();
    }

    /// The form-urlencoded query without the leading `?`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.path)?;
        if !self.params.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_query() {
        let location = Location::parse("?q=one+piece&ano=1999").unwrap();
        assert_eq!(location.path(), "/");
        assert_eq!(location.param("q"), Some("one piece"));
        assert_eq!(location.param("ano"), Some("1999"));
        assert_eq!(location.param("genero"), None);
    }

    #[test]
    fn parses_full_url_and_keeps_origin() {
        let location = Location::parse("https://example.com/anime/?genero=A%C3%A7%C3%A3o#top").unwrap();
        assert_eq!(location.path(), "/anime/");
        assert_eq!(location.param("genero"), Some("Ação"));
        assert_eq!(location.to_string(), "https://example.com/anime/?genero=A%C3%A7%C3%A3o");
    }

    #[test]
    fn clearing_keeps_the_path() {
        let mut location = Location::parse("/top?q=x&ordem=ano").unwrap();
        location.clear_params();
        assert_eq!(location.to_string(), "marquee://catalog/top");
    }

    #[test]
    fn empty_values_still_count_as_present() {
        let location = Location::parse("?q=").unwrap();
        assert!(location.has_any(&["q", "ano"]));
        assert!(!location.has_any(&["ano"]));
    }

    #[test]
    fn serializes_spaces_as_plus() {
        let mut location = Location::default();
        location.replace_params(vec![("q".into(), "attack on titan".into())]);
        assert_eq!(location.to_string(), "marquee://catalog/?q=attack+on+titan");
    }
}
