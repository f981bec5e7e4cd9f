//! Driver registry and entry point
//!
//! The manager owns the shared [`Context`] (configuration, HTTP client,
//! cache bridge, custom-driver registry) and hands out configured [`Driver`]
//! handles by name. It also forwards the common operations straight to the
//! configured default driver for callers that never need to pick one.

use crate::cache::{CacheStore, FaviconCache, MemoryStore};
use crate::config::Config;
use crate::drivers::{self, Context, Driver, FetchedOr, Fetcher};
use crate::favicon::{Favicon, FaviconCollection};
use std::sync::Arc;

/// Builds drivers by name and forwards fetch operations to the default one.
pub struct FetcherManager {
    ctx: Arc<Context>,
}

impl FetcherManager {
    /// Creates a manager over the given configuration and cache store.
    ///
    /// Fails if the HTTP client cannot be built from the configured
    /// timeouts and user agent.
    pub fn new(config: Config, store: Arc<dyn CacheStore>) -> crate::Result<Self> {
        Ok(Self {
            ctx: Arc::new(Context::new(config, store)?),
        })
    }

    /// Creates a manager with default configuration and an in-memory cache.
    pub fn with_defaults() -> crate::Result<Self> {
        Self::new(Config::default(), Arc::new(MemoryStore::new()))
    }

    /// Resolves a driver handle by name, or the configured default when no
    /// name is given.
    ///
    /// Built-in names are checked first, then the custom registry; an
    /// unrecognized name fails with [`FetchError::UnknownDriver`].
    ///
    /// [`FetchError::UnknownDriver`]: crate::FetchError::UnknownDriver
    pub fn driver(&self, name: Option<&str>) -> crate::Result<Driver> {
        let name = name.unwrap_or(&self.ctx.config().fetcher.default_driver);
        drivers::resolve(&self.ctx, name)
    }

    /// Registers a custom strategy under the given name, overwriting any
    /// previous registration. Lasts for the manager's lifetime.
    pub fn register(&self, name: impl Into<String>, fetcher: Arc<dyn Fetcher>) {
        self.ctx.register(name.into(), fetcher);
    }

    /// The cache bridge, for callers that write results back after a live
    /// resolution.
    pub fn cache(&self) -> &FaviconCache {
        self.ctx.cache()
    }

    /// The shared HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        self.ctx.http()
    }

    /// The manager's configuration.
    pub fn config(&self) -> &Config {
        self.ctx.config()
    }

    /// Fetches the single best favicon using the default driver.
    pub async fn fetch(&self, url: &str) -> crate::Result<Option<Favicon>> {
        self.driver(None)?.fetch(url).await
    }

    /// Fetches every discoverable favicon using the default driver.
    pub async fn fetch_all(&self, url: &str) -> crate::Result<FaviconCollection> {
        self.driver(None)?.fetch_all(url).await
    }

    /// Fetches with the default driver, substituting `default` when nothing
    /// is found.
    pub async fn fetch_or<T: Send>(
        &self,
        url: &str,
        default: T,
    ) -> crate::Result<FetchedOr<Favicon, T>> {
        self.driver(None)?.fetch_or(url, default).await
    }

    /// Fetches with the default driver, lazily building the default from
    /// the URL when nothing is found.
    pub async fn fetch_or_else<T, F>(
        &self,
        url: &str,
        default: F,
    ) -> crate::Result<FetchedOr<Favicon, T>>
    where
        F: FnOnce(&str) -> T + Send,
        T: Send,
    {
        self.driver(None)?.fetch_or_else(url, default).await
    }

    /// Fetches all with the default driver, substituting `default` for an
    /// empty collection.
    pub async fn fetch_all_or<T: Send>(
        &self,
        url: &str,
        default: T,
    ) -> crate::Result<FetchedOr<FaviconCollection, T>> {
        self.driver(None)?.fetch_all_or(url, default).await
    }

    /// Fetches all with the default driver, lazily building the default for
    /// an empty collection.
    pub async fn fetch_all_or_else<T, F>(
        &self,
        url: &str,
        default: F,
    ) -> crate::Result<FetchedOr<FaviconCollection, T>>
    where
        F: FnOnce(&str) -> T + Send,
        T: Send,
    {
        self.driver(None)?.fetch_all_or_else(url, default).await
    }
}
