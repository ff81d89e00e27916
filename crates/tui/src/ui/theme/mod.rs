//! Theme styling module for the TUI.
//!
//! Defines the color palettes (Dracula, Nord), the semantic roles every
//! component styles itself with, and helper builders for Ratatui widgets.
//! Prefer these helpers over hard-coding colors.

use tracing::{debug, warn};

pub mod catalog;
pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use catalog::ThemeDefinition;
pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Theme plus the definition it was built from.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

/// Selects the named theme, falling back to the default for unknown names.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    let Some(name) = preferred_theme.map(str::trim).filter(|name| !name.is_empty()) else {
        return LoadedTheme::from_definition(catalog::default_definition());
    };
    match catalog::resolve(name) {
        Some(definition) => {
            debug!(theme = definition.label, "theme selected");
            LoadedTheme::from_definition(definition)
        }
        None => {
            warn!(theme = name, "unknown theme; using the default");
            LoadedTheme::from_definition(catalog::default_definition())
        }
    }
}
