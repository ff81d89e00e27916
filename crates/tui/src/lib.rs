//! # marquee TUI
//!
//! Terminal front end for the catalog browser, built on Ratatui.
//!
//! The screen is a filter bar (search, genre, year, order, Clear) above a
//! scrollable list of title cards. Activating a card opens it as a modal
//! over a dimmed backdrop; each card links out to a streaming search.
//!
//! ## Architecture
//!
//! Components (`ui::components`) handle input and render from the shared
//! `App` state, returning `Effect`s. The runtime applies navigation effects
//! itself and hands the rest to the command layer (`cmd`).

mod app;
mod cmd;
mod ui;

use anyhow::{Context, Result};
use marquee_engine::{FilterSynchronizer, Location};
use marquee_util::{JsonFilterStore, MarqueeConfig};
use tracing::info;

/// Runs the TUI until the user quits.
///
/// The starting filters come from `config.location` when it carries any
/// filter parameter, otherwise from the filters persisted at
/// `config.filters_path`.
///
/// # Returns
///
/// The shareable location for the filters active at exit.
///
/// # Errors
///
/// Fails when the configured location is not a valid URL or the terminal
/// cannot be set up. A catalog that fails to load is not an error here; it
/// is reported on screen.
///
/// # Example
///
/// ```no_run
/// use marquee_util::{ConfigOverrides, MarqueeConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let location = marquee_tui::run(MarqueeConfig::resolve(ConfigOverrides::default())).await?;
///     eprintln!("{location}");
///     Ok(())
/// }
/// ```
pub async fn run(config: MarqueeConfig) -> Result<Location> {
    let location = Location::parse(config.location.as_deref().unwrap_or_default())
        .with_context(|| format!("invalid location {:?}", config.location.as_deref().unwrap_or_default()))?;
    let store = JsonFilterStore::new(config.filters_path.clone());
    let sync = FilterSynchronizer::new(location, store);

    let loaded_theme = ui::theme::load(config.theme.as_deref());
    info!(theme = loaded_theme.definition.id, "starting marquee");
    let ctx = app::SharedCtx::new(loaded_theme.theme, config.catalog_source.to_string());
    let app = app::App::new(ctx, sync);

    ui::runtime::run_app(app, config.catalog_source).await
}
