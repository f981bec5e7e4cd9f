//! Configuration module for favicon-scout
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings default, so running without a configuration file is
//! supported.
//!
//! # Example
//!
//! ```no_run
//! use favicon_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Default driver: {}", config.fetcher.default_driver);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, FetcherConfig, HttpConfig};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
