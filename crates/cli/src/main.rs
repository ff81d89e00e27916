use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use marquee_engine::{CardView, FilterOptions, FilterSynchronizer, Location, RenderedView, apply, render};
use marquee_types::{Catalog, FilterState, SortOrder};
use marquee_util::{ConfigOverrides, FilterStore, JsonFilterStore, MarqueeConfig};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Browse a ranked title catalog from the terminal.
///
/// Without a command, starts the interactive browser and prints the share
/// location of the final filters on exit.
#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
struct Cli {
    /// Catalog source: a JSON file path or an http(s) URL
    #[arg(long, global = true, value_name = "PATH|URL")]
    source: Option<String>,
    /// Share location to start from, e.g. "?genero=Ação&ordem=ano"
    #[arg(long, global = true, value_name = "URL")]
    location: Option<String>,
    /// File holding the persisted filters
    #[arg(long = "filters-file", global = true, value_name = "PATH")]
    filters_file: Option<String>,
    /// Theme for the interactive browser (dracula, nord)
    #[arg(long, global = true, value_name = "NAME")]
    theme: Option<String>,
    /// Log file for the interactive browser
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the titles matching the filters
    List(ListArgs),
    /// Print the available genre and year options
    Options {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Forget the persisted filters
    Clear,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive title search
    #[arg(long)]
    query: Option<String>,
    /// Exact genre
    #[arg(long)]
    genre: Option<String>,
    /// Release year
    #[arg(long)]
    year: Option<String>,
    /// Sort order
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Print a JSON array instead of text cards
    #[arg(long)]
    json: bool,
    /// Persist the resulting filters like the interactive browser does
    #[arg(long)]
    save: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    #[value(alias = "posicao")]
    Rank,
    #[value(alias = "titulo")]
    Title,
    #[value(alias = "ano")]
    Year,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Rank => SortOrder::Rank,
            OrderArg::Title => SortOrder::Title,
            OrderArg::Year => SortOrder::Year,
        }
    }
}

impl ListArgs {
    /// Explicit flags win over whatever state was resolved.
    fn overlay(&self, mut state: FilterState) -> FilterState {
        if let Some(query) = &self.query {
            state.query = query.clone();
        }
        if let Some(genre) = &self.genre {
            state.genre = genre.clone();
        }
        if let Some(year) = &self.year {
            state.year = year.clone();
        }
        if let Some(order) = self.order {
            state.order = order.into();
        }
        state
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MarqueeConfig::resolve(ConfigOverrides {
        catalog_source: cli.source.clone(),
        location: cli.location.clone(),
        filters_path: cli.filters_file.clone(),
        log_path: cli.log_file.clone(),
        theme: cli.theme.clone(),
    });

    // No subcommand => TUI
    let Some(command) = cli.command else {
        init_file_tracing(&config.log_path)?;
        let location = marquee_tui::run(config).await?;
        eprintln!("{location}");
        return Ok(());
    };

    init_stderr_tracing();
    match command {
        Command::List(args) => run_list(&config, &args).await,
        Command::Options { json } => run_options(&config, json).await,
        Command::Clear => run_clear(&config),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The TUI owns the terminal, so its logs go to a file without ANSI colors.
fn init_file_tracing(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_location(config: &MarqueeConfig) -> Result<Location> {
    let raw = config.location.as_deref().unwrap_or_default();
    Location::parse(raw).with_context(|| format!("invalid location {raw:?}"))
}

async fn load_catalog(config: &MarqueeConfig) -> Result<Catalog> {
    config
        .catalog_source
        .load()
        .await
        .with_context(|| format!("loading catalog from {}", config.catalog_source))
}

async fn run_list(config: &MarqueeConfig, args: &ListArgs) -> Result<()> {
    let catalog = load_catalog(config).await?;
    let store = JsonFilterStore::new(config.filters_path.clone());
    let mut sync = FilterSynchronizer::new(parse_location(config)?, store);

    let state = args.overlay(sync.resolve_initial_state());
    debug!(?state, "resolved filters");
    if args.save {
        sync.persist(&state)
            .with_context(|| format!("saving filters to {}", config.filters_path.display()))?;
        info!(path = %config.filters_path.display(), "filters saved");
    } else {
        sync.write_location(&state);
    }

    let view = apply(&catalog, &state);
    let rendered = render(&catalog, &view);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards_json(rendered.cards()))?);
    } else {
        print!("{}", format_cards(&rendered));
    }
    eprintln!("{}", sync.location());
    Ok(())
}

async fn run_options(config: &MarqueeConfig, json: bool) -> Result<()> {
    let catalog = load_catalog(config).await?;
    let options = FilterOptions::from_catalog(&catalog);
    if json {
        let out = json!({ "genres": options.genres, "years": options.years });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Genres: {}", options.genres.join(", "));
        println!("Years: {}", options.year_values().join(", "));
    }
    Ok(())
}

fn run_clear(config: &MarqueeConfig) -> Result<()> {
    let mut location = parse_location(config)?;
    let store = JsonFilterStore::new(config.filters_path.clone());
    store
        .remove()
        .with_context(|| format!("removing {}", config.filters_path.display()))?;
    location.clear_params();
    info!(path = %config.filters_path.display(), "persisted filters removed");
    println!("{location}");
    Ok(())
}

fn cards_json(cards: &[CardView]) -> serde_json::Value {
    cards
        .iter()
        .map(|card| {
            json!({
                "rank": card.rank,
                "heading": card.heading,
                "rating": card.rating,
                "year": card.year,
                "genres": card.genres,
                "synopsis": card.synopsis,
                "creator": card.creator,
                "image_url": card.image_url,
                "streaming_url": card.streaming_url,
            })
        })
        .collect()
}

/// Text cards, or the single status message when there are none.
fn format_cards(rendered: &RenderedView) -> String {
    if let Some(message) = rendered.indicator() {
        return format!("{message}\n");
    }
    let mut out = String::new();
    for card in rendered.cards() {
        out.push_str(&format!("{}\n", card.heading));
        out.push_str(&format!("   ★ {} · {} · {}\n", card.rating, card.year, card.genres));
        out.push_str(&format!("   Where to watch? {}\n", card.streaming_url));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_types::Item;

    fn catalog() -> Catalog {
        let item = |rank: u32, title: &str, year: i32| Item {
            rank,
            title: title.to_string(),
            rating: 8.5,
            year,
            genres: vec!["Drama".to_string()],
            synopsis: String::new(),
            creator: String::new(),
            image_url: String::new(),
        };
        Catalog::new(vec![item(1, "Monster", 2004), item(2, "Mushishi", 2005)]).unwrap()
    }

    #[test]
    fn list_flags_parse_with_wire_aliases() {
        let cli = Cli::try_parse_from(["marquee", "--source", "data.json", "list", "--order", "ano", "--year", "2004"]).unwrap();
        let Some(Command::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.order, Some(OrderArg::Year));
        assert_eq!(cli.source.as_deref(), Some("data.json"));
    }

    #[test]
    fn explicit_flags_override_resolved_state() {
        let cli = Cli::try_parse_from(["marquee", "list", "--genre", "Drama"]).unwrap();
        let Some(Command::List(args)) = cli.command else {
            panic!("expected list");
        };
        let resolved = FilterState {
            query: "mon".into(),
            genre: "Ação".into(),
            ..FilterState::default()
        };
        let state = args.overlay(resolved);
        assert_eq!(state.query, "mon");
        assert_eq!(state.genre, "Drama");
        assert_eq!(state.order, SortOrder::Rank);
    }

    #[test]
    fn text_output_lists_cards_or_the_indicator() {
        let catalog = catalog();
        let all = render(&catalog, &apply(&catalog, &FilterState::default()));
        let text = format_cards(&all);
        assert!(text.starts_with("1. Monster\n"));
        assert!(text.contains("https://www.justwatch.com/br/busca?q=Mushishi"));

        let none = FilterState {
            year: "1999".into(),
            ..FilterState::default()
        };
        let empty = render(&catalog, &apply(&catalog, &none));
        assert_eq!(format_cards(&empty), "No titles match the selected filters.\n");
    }

    #[test]
    fn json_output_is_an_array_of_cards() {
        let catalog = catalog();
        let rendered = render(&catalog, &apply(&catalog, &FilterState::default()));
        let value = cards_json(rendered.cards());
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["heading"], "2. Mushishi");
    }
}
