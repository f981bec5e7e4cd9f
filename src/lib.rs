//! favicon-scout: multi-strategy favicon resolution
//!
//! This crate resolves a website's favicon URL given only the site's base URL.
//! Several interchangeable strategies ("drivers") are tried through a fallback
//! chain: direct HTML `<link>` tag parsing, plus a handful of third-party icon
//! APIs. Results are cached through a pluggable cache store.

pub mod cache;
pub mod config;
pub mod drivers;
pub mod favicon;
pub mod html;
pub mod manager;
pub mod url;

use thiserror::Error;

/// Main error type for favicon-scout operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} is not a valid URL")]
    InvalidUrl(String),

    #[error("A favicon cannot be found for {0}")]
    NotFound(String),

    #[error("The {driver} driver does not support fetching all favicons")]
    FeatureNotSupported { driver: String },

    #[error("{0} is not a valid driver")]
    UnknownDriver(String),

    #[error("Connection failure for {url}: {source}")]
    Connection { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache store error: {0}")]
    Store(#[from] cache::CacheStoreError),

    #[error("Cache format error: {0}")]
    CacheFormat(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for favicon-scout operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use drivers::{Driver, DriverConfig, FetchedOr, Fetcher};
pub use favicon::{Favicon, FaviconCollection, IconType};
pub use manager::FetcherManager;
