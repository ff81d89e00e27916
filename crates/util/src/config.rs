//! Runtime configuration for marquee.
//!
//! Every setting resolves with the same precedence: explicit override (CLI
//! flag), then environment variable, then default. Default file locations
//! live under the platform config directory (`~/.config/marquee` on most
//! platforms).

use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

use crate::catalog_source::CatalogSource;
use crate::filter_store::FILTERS_ENTRY_NAME;

/// Environment variable naming the catalog source (path or URL).
pub const CATALOG_ENV: &str = "MARQUEE_CATALOG";
/// Environment variable overriding the persisted filters file.
pub const FILTERS_PATH_ENV: &str = "MARQUEE_FILTERS_PATH";
/// Environment variable overriding the TUI log file.
pub const LOG_PATH_ENV: &str = "MARQUEE_LOG_PATH";
/// Environment variable selecting the theme.
pub const THEME_ENV: &str = "TUI_THEME";

pub const DEFAULT_CATALOG_SOURCE: &str = "data.json";
const LOG_FILE_NAME: &str = "marquee.log";

/// Values supplied explicitly, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog_source: Option<String>,
    pub location: Option<String>,
    pub filters_path: Option<String>,
    pub log_path: Option<String>,
    pub theme: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct MarqueeConfig {
    pub catalog_source: CatalogSource,
    /// Location to start from. Only ever supplied explicitly.
    pub location: Option<String>,
    pub filters_path: PathBuf,
    pub log_path: PathBuf,
    pub theme: Option<String>,
}

impl MarqueeConfig {
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let catalog_source = overrides
            .catalog_source
            .or_else(|| env_value(CATALOG_ENV))
            .unwrap_or_else(|| DEFAULT_CATALOG_SOURCE.to_string());
        let filters_path = overrides
            .filters_path
            .or_else(|| env_value(FILTERS_PATH_ENV))
            .map(|path| expand_tilde(&path))
            .unwrap_or_else(|| config_root().join(format!("{FILTERS_ENTRY_NAME}.json")));
        let log_path = overrides
            .log_path
            .or_else(|| env_value(LOG_PATH_ENV))
            .map(|path| expand_tilde(&path))
            .unwrap_or_else(|| config_root().join(LOG_FILE_NAME));

        Self {
            catalog_source: CatalogSource::parse(&catalog_source),
            location: overrides.location.filter(|location| !location.trim().is_empty()),
            filters_path,
            log_path,
            theme: overrides.theme.or_else(|| env_value(THEME_ENV)),
        }
    }
}

/// Directory holding marquee's own files.
pub fn config_root() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("marquee")
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_environment() {
        temp_env::with_vars(
            [
                (CATALOG_ENV, Some("from-env.json")),
                (FILTERS_PATH_ENV, Some("/tmp/env-filters.json")),
                (THEME_ENV, Some("nord")),
            ],
            || {
                let config = MarqueeConfig::resolve(ConfigOverrides {
                    catalog_source: Some("https://example.com/data.json".into()),
                    theme: Some("dracula".into()),
                    ..Default::default()
                });
                assert!(matches!(config.catalog_source, CatalogSource::Remote(_)));
                assert_eq!(config.filters_path, PathBuf::from("/tmp/env-filters.json"));
                assert_eq!(config.theme.as_deref(), Some("dracula"));
            },
        );
    }

    #[test]
    fn defaults_apply_without_environment() {
        temp_env::with_vars_unset([CATALOG_ENV, FILTERS_PATH_ENV, LOG_PATH_ENV, THEME_ENV], || {
            let config = MarqueeConfig::resolve(ConfigOverrides::default());
            assert_eq!(config.catalog_source, CatalogSource::File(PathBuf::from(DEFAULT_CATALOG_SOURCE)));
            assert!(config.filters_path.ends_with("marquee/filtrosSalvos.json"));
            assert!(config.log_path.ends_with("marquee/marquee.log"));
            assert!(config.theme.is_none());
            assert!(config.location.is_none());
        });
    }

    #[test]
    fn blank_location_is_ignored() {
        let config = MarqueeConfig::resolve(ConfigOverrides {
            location: Some("   ".into()),
            ..Default::default()
        });
        assert!(config.location.is_none());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.json"), home.join("x.json"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde(" plain.json "), PathBuf::from("plain.json"));
    }
}
