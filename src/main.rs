//! favicon-scout main entry point
//!
//! This is the command-line interface for resolving a website's favicon.

use clap::{Parser, Subcommand};
use favicon_scout::cache::{CacheStore, MemoryStore, SqliteStore};
use favicon_scout::config::{load_config, Config};
use favicon_scout::favicon::{DiskStorage, Favicon};
use favicon_scout::{Driver, FetcherManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// favicon-scout: multi-strategy favicon resolution
///
/// Resolves a website's favicon URL given only the site's base URL, trying
/// interchangeable drivers (local HTML parsing or third-party icon APIs)
/// with caching and fallback chaining.
#[derive(Parser, Debug)]
#[command(name = "favicon-scout")]
#[command(version = "0.1.0")]
#[command(about = "Resolve a website's favicon", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the single best favicon for a site
    Fetch {
        /// Site URL, including the scheme
        url: String,

        #[command(flatten)]
        options: DriverOptions,

        /// Download the icon into this directory after resolving it
        #[arg(long, value_name = "DIR")]
        save_to: Option<PathBuf>,
    },

    /// Resolve every discoverable favicon for a site
    FetchAll {
        /// Site URL, including the scheme
        url: String,

        #[command(flatten)]
        options: DriverOptions,

        /// Print only the largest icon instead of the whole collection
        #[arg(long)]
        largest: bool,
    },
}

/// Driver selection flags shared by both subcommands.
#[derive(clap::Args, Debug)]
struct DriverOptions {
    /// Driver to use (defaults to the configured default driver)
    #[arg(short, long)]
    driver: Option<String>,

    /// Fallback driver to try when nothing is found (repeatable, in order)
    #[arg(long = "fallback", value_name = "DRIVER")]
    fallbacks: Vec<String>,

    /// Exit with an error when no favicon is found
    #[arg(long)]
    throw: bool,

    /// Skip the cache and always resolve live
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    let store: Arc<dyn CacheStore> = match &config.cache.database_path {
        Some(path) => {
            tracing::debug!(path = %path, "using SQLite cache store");
            Arc::new(SqliteStore::open(Path::new(path))?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let ttl = Duration::from_secs(config.cache.ttl_seconds);
    let manager = FetcherManager::new(config, store)?;

    match cli.command {
        Command::Fetch {
            url,
            options,
            save_to,
        } => handle_fetch(&manager, &url, options, save_to, ttl).await,
        Command::FetchAll {
            url,
            options,
            largest,
        } => handle_fetch_all(&manager, &url, options, largest, ttl).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("favicon_scout=info,warn"),
            1 => EnvFilter::new("favicon_scout=debug,info"),
            2 => EnvFilter::new("favicon_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies the shared driver flags to a freshly resolved driver handle.
fn configure_driver(driver: Driver, options: &DriverOptions) -> Driver {
    driver
        .with_fallback(options.fallbacks.iter().cloned())
        .throw_on_not_found(options.throw)
        .use_cache(!options.no_cache)
}

/// Handles the `fetch` subcommand: resolve, cache, print, optionally save.
async fn handle_fetch(
    manager: &FetcherManager,
    url: &str,
    options: DriverOptions,
    save_to: Option<PathBuf>,
    ttl: Duration,
) -> anyhow::Result<()> {
    let driver = configure_driver(manager.driver(options.driver.as_deref())?, &options);

    match driver.fetch(url).await {
        Ok(Some(favicon)) => {
            manager.cache().write_single(&favicon, ttl, false)?;
            print_favicon(&favicon);

            if let Some(directory) = save_to {
                let path = save_favicon(manager, &favicon, &directory).await?;
                println!("saved: {}", path);
            }

            Ok(())
        }
        Ok(None) => {
            println!("no favicon found for {}", url);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Fetch failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the `fetch-all` subcommand: resolve the collection, cache it, and
/// print either every icon or only the largest.
async fn handle_fetch_all(
    manager: &FetcherManager,
    url: &str,
    options: DriverOptions,
    largest: bool,
    ttl: Duration,
) -> anyhow::Result<()> {
    let driver = configure_driver(manager.driver(options.driver.as_deref())?, &options);

    match driver.fetch_all(url).await {
        Ok(favicons) => {
            if favicons.is_empty() {
                println!("no favicons found for {}", url);
                std::process::exit(1);
            }

            manager.cache().write_collection(&favicons, ttl, false)?;

            if largest {
                if let Some(favicon) = favicons.largest() {
                    print_favicon(favicon);
                }
            } else {
                for favicon in favicons.iter() {
                    print_favicon(favicon);
                }
            }

            Ok(())
        }
        Err(e) => {
            tracing::error!("Fetch failed: {}", e);
            Err(e.into())
        }
    }
}

/// Prints one resolved favicon as a single human-readable line.
fn print_favicon(favicon: &Favicon) {
    let size = favicon
        .icon_size()
        .map(|s| format!("{}x{}", s, s))
        .unwrap_or_else(|| "?".to_string());

    println!(
        "{} type={} size={} cached={}",
        favicon.favicon_url(),
        favicon.icon_type(),
        size,
        favicon.retrieved_from_cache(),
    );
}

/// Downloads the favicon into the given directory, named after the site.
async fn save_favicon(
    manager: &FetcherManager,
    favicon: &Favicon,
    directory: &Path,
) -> anyhow::Result<String> {
    let storage = DiskStorage::new(directory);

    let filename = favicon_scout::url::strip_scheme(favicon.url())
        .replace(['/', ':'], "-")
        .trim_end_matches('-')
        .to_string();

    let path = favicon
        .store_as("icons", &filename, &storage, manager.http())
        .await?;

    Ok(path)
}
