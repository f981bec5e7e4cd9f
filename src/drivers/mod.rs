//! Driver contract and fallback orchestration
//!
//! A driver is one interchangeable strategy for resolving a favicon: parsing
//! the site's own HTML, or asking a third-party icon API. Strategies
//! implement the [`Fetcher`] trait; callers hold a [`Driver`], which layers
//! the shared behavior on top of whichever strategy it wraps:
//!
//! - URL validation before any I/O
//! - cache lookup (unless disabled per call)
//! - fallback chaining across other drivers, in registration order
//! - the throw-vs-null boundary for the not-found outcome
//! - `fetch_or` / `fetch_all_or` default substitution

mod duck_duck_go;
mod favicon_grabber;
mod favicon_kit;
mod google_shared_stuff;
mod http;
mod unavatar;

pub use duck_duck_go::DuckDuckGoDriver;
pub use favicon_grabber::FaviconGrabberDriver;
pub use favicon_kit::FaviconKitDriver;
pub use google_shared_stuff::GoogleSharedStuffDriver;
pub use http::HttpDriver;
pub use unavatar::UnavatarDriver;

use crate::cache::{CacheStore, FaviconCache};
use crate::config::{Config, HttpConfig};
use crate::favicon::{Favicon, FaviconCollection};
use crate::url::is_valid_url;
use crate::FetchError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Names of the drivers that ship with the crate.
pub const BUILTIN_DRIVERS: &[&str] = &[
    "http",
    "google-shared-stuff",
    "favicon-kit",
    "unavatar",
    "favicon-grabber",
    "duck-duck-go",
];

/// Builds the HTTP client shared by every driver.
///
/// A timeout of 0 means no timeout, matching the configuration contract.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if config.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout));
    }

    if config.connect_timeout > 0 {
        builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout));
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    builder.build()
}

/// Shared state behind every driver: configuration, the HTTP client, the
/// cache bridge, and the custom-strategy registry.
pub struct Context {
    config: Config,
    http: Client,
    cache: FaviconCache,
    custom: Mutex<HashMap<String, Arc<dyn Fetcher>>>,
}

impl Context {
    pub(crate) fn new(config: Config, store: Arc<dyn CacheStore>) -> crate::Result<Self> {
        let http = build_http_client(&config.http)?;
        let cache = FaviconCache::new(store, config.cache.prefix.clone());

        Ok(Self {
            config,
            http,
            cache,
            custom: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn cache(&self) -> &FaviconCache {
        &self.cache
    }

    pub(crate) fn register(&self, name: String, fetcher: Arc<dyn Fetcher>) {
        let mut custom = self
            .custom
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        custom.insert(name, fetcher);
    }

    fn custom(&self, name: &str) -> Option<Arc<dyn Fetcher>> {
        let custom = self
            .custom
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        custom.get(name).cloned()
    }

    /// Issues a GET request, mapping transport-level failures to
    /// [`FetchError::Connection`]. HTTP error statuses are returned as
    /// ordinary responses; callers decide what a non-2xx means.
    pub(crate) async fn get(&self, url: &str) -> crate::Result<reqwest::Response> {
        self.http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.to_string(),
                source,
            })
    }

    /// Checks whether a candidate icon URL answers with a success status.
    pub(crate) async fn reachable(&self, url: &str) -> crate::Result<bool> {
        Ok(self.get(url).await?.status().is_success())
    }
}

/// One interchangeable favicon resolution strategy.
///
/// Implementations perform only their own upstream protocol; validation,
/// caching, fallbacks and the not-found policy are handled by [`Driver`].
/// `resolve` returning `Ok(None)` means "this strategy found nothing", which
/// is a soft signal; transport failures are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// The driver's registry name, also recorded as favicon provenance.
    fn name(&self) -> &str;

    /// Attempts to resolve the single best favicon for the URL.
    async fn resolve(&self, ctx: &Context, url: &str) -> crate::Result<Option<Favicon>>;

    /// Attempts to resolve every discoverable favicon for the URL.
    ///
    /// The default implementation fails with `FeatureNotSupported`: most
    /// third-party icon APIs can only answer with one icon.
    async fn resolve_all(
        &self,
        ctx: &Context,
        url: &str,
    ) -> crate::Result<Option<FaviconCollection>> {
        let _ = (ctx, url);
        Err(FetchError::FeatureNotSupported {
            driver: self.name().to_string(),
        })
    }
}

/// Per-call driver configuration, mutated only through the fluent builder
/// methods on [`Driver`] and read-only during resolution.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Driver names tried, in order, when the primary strategy finds nothing
    pub fallbacks: Vec<String>,

    /// Whether the not-found outcome becomes an error instead of `None`
    pub throw_on_not_found: bool,

    /// Whether to consult the cache before resolving live
    pub use_cache: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fallbacks: Vec::new(),
            throw_on_not_found: false,
            use_cache: true,
        }
    }
}

/// Result of a `fetch_or`-style call: either a resolved value or the
/// caller's substituted default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedOr<V, T> {
    /// The driver (or a fallback) resolved a value
    Found(V),
    /// Nothing was resolved; this is the caller's default
    Default(T),
}

impl<V, T> FetchedOr<V, T> {
    /// Returns the resolved value, discarding a default.
    pub fn found(self) -> Option<V> {
        match self {
            FetchedOr::Found(value) => Some(value),
            FetchedOr::Default(_) => None,
        }
    }

    /// Returns the substituted default, discarding a resolved value.
    pub fn default_value(self) -> Option<T> {
        match self {
            FetchedOr::Found(_) => None,
            FetchedOr::Default(default) => Some(default),
        }
    }
}

/// A configured handle on one strategy.
///
/// Cheap to construct; the manager builds a fresh one per `driver()` call so
/// fluent configuration never leaks between callers.
pub struct Driver {
    fetcher: Arc<dyn Fetcher>,
    ctx: Arc<Context>,
    config: DriverConfig,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.fetcher.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Resolves a driver name to a configured handle: built-ins first, then the
/// custom registry.
pub(crate) fn resolve(ctx: &Arc<Context>, name: &str) -> crate::Result<Driver> {
    let fetcher: Arc<dyn Fetcher> = match name {
        "http" => Arc::new(HttpDriver::new()),
        "google-shared-stuff" => Arc::new(GoogleSharedStuffDriver::new()),
        "favicon-kit" => Arc::new(FaviconKitDriver::new()),
        "unavatar" => Arc::new(UnavatarDriver::new()),
        "favicon-grabber" => Arc::new(FaviconGrabberDriver::new()),
        "duck-duck-go" => Arc::new(DuckDuckGoDriver::new()),
        other => ctx
            .custom(other)
            .ok_or_else(|| FetchError::UnknownDriver(other.to_string()))?,
    };

    Ok(Driver::new(fetcher, Arc::clone(ctx)))
}

// Fallback invocations are boxed so the recursive future type stays finite.
fn fetch_via_fallback(
    driver: Driver,
    url: String,
) -> BoxFuture<'static, crate::Result<Option<Favicon>>> {
    Box::pin(async move { driver.fetch(&url).await })
}

fn fetch_all_via_fallback(
    driver: Driver,
    url: String,
) -> BoxFuture<'static, crate::Result<FaviconCollection>> {
    Box::pin(async move { driver.fetch_all(&url).await })
}

impl Driver {
    pub(crate) fn new(fetcher: Arc<dyn Fetcher>, ctx: Arc<Context>) -> Self {
        Self {
            fetcher,
            ctx,
            config: DriverConfig::default(),
        }
    }

    /// The wrapped strategy's registry name.
    pub fn name(&self) -> &str {
        self.fetcher.name()
    }

    /// The current per-call configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Appends driver names to try, in order, when this driver finds
    /// nothing.
    pub fn with_fallback<I, S>(mut self, fallbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .fallbacks
            .extend(fallbacks.into_iter().map(Into::into));
        self
    }

    /// Selects whether the not-found outcome becomes an error.
    pub fn throw_on_not_found(mut self, throw: bool) -> Self {
        self.config.throw_on_not_found = throw;
        self
    }

    /// Selects whether the cache is consulted before resolving live.
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.config.use_cache = use_cache;
        self
    }

    /// Attempts to fetch the single best favicon for the URL.
    ///
    /// Returns `Ok(None)` when neither this driver nor any configured
    /// fallback finds an icon, unless `throw_on_not_found` upgraded that
    /// outcome to [`FetchError::NotFound`].
    pub async fn fetch(&self, url: &str) -> crate::Result<Option<Favicon>> {
        if !is_valid_url(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        if self.config.use_cache {
            if let Some(favicon) = self.ctx.cache().read_single(url)? {
                tracing::debug!(url, driver = self.name(), "favicon cache hit");
                return Ok(Some(favicon));
            }
        }

        match self.fetcher.resolve(&self.ctx, url).await? {
            Some(favicon) => Ok(Some(favicon)),
            None => self.not_found(url).await,
        }
    }

    /// Attempts to fetch every discoverable favicon for the URL.
    ///
    /// Not-found surfaces as an empty collection unless
    /// `throw_on_not_found` is set. Drivers whose upstream cannot enumerate
    /// icons fail with [`FetchError::FeatureNotSupported`].
    pub async fn fetch_all(&self, url: &str) -> crate::Result<FaviconCollection> {
        if !is_valid_url(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        if self.config.use_cache {
            if let Some(favicons) = self.ctx.cache().read_collection(url)? {
                if !favicons.is_empty() {
                    tracing::debug!(url, driver = self.name(), "favicon collection cache hit");
                    return Ok(favicons);
                }
            }
        }

        match self.fetcher.resolve_all(&self.ctx, url).await? {
            Some(favicons) if !favicons.is_empty() => Ok(favicons),
            _ => self.collection_not_found(url).await,
        }
    }

    /// Calls [`fetch`](Self::fetch), substituting `default` when nothing is
    /// found.
    pub async fn fetch_or<T: Send>(
        &self,
        url: &str,
        default: T,
    ) -> crate::Result<FetchedOr<Favicon, T>> {
        self.fetch_or_else(url, |_| default).await
    }

    /// Calls [`fetch`](Self::fetch), lazily building the default from the
    /// URL when nothing is found. The closure runs at most once.
    pub async fn fetch_or_else<T, F>(
        &self,
        url: &str,
        default: F,
    ) -> crate::Result<FetchedOr<Favicon, T>>
    where
        F: FnOnce(&str) -> T + Send,
        T: Send,
    {
        match self.fetch(url).await? {
            Some(favicon) => Ok(FetchedOr::Found(favicon)),
            None => Ok(FetchedOr::Default(default(url))),
        }
    }

    /// Calls [`fetch_all`](Self::fetch_all), substituting `default` when the
    /// collection comes back empty.
    pub async fn fetch_all_or<T: Send>(
        &self,
        url: &str,
        default: T,
    ) -> crate::Result<FetchedOr<FaviconCollection, T>> {
        self.fetch_all_or_else(url, |_| default).await
    }

    /// Calls [`fetch_all`](Self::fetch_all), lazily building the default
    /// from the URL when the collection comes back empty.
    pub async fn fetch_all_or_else<T, F>(
        &self,
        url: &str,
        default: F,
    ) -> crate::Result<FetchedOr<FaviconCollection, T>>
    where
        F: FnOnce(&str) -> T + Send,
        T: Send,
    {
        let favicons = self.fetch_all(url).await?;

        if favicons.is_empty() {
            Ok(FetchedOr::Default(default(url)))
        } else {
            Ok(FetchedOr::Found(favicons))
        }
    }

    /// Not-found handling for single-icon fetches: walk the fallback chain
    /// in order, then apply the throw-vs-null policy.
    ///
    /// The chain is sequential on purpose; racing several upstream APIs
    /// speculatively is not acceptable here.
    async fn not_found(&self, url: &str) -> crate::Result<Option<Favicon>> {
        for name in &self.config.fallbacks {
            tracing::debug!(url, fallback = name.as_str(), "trying fallback driver");
            let driver = resolve(&self.ctx, name)?;

            if let Some(favicon) = fetch_via_fallback(driver, url.to_string()).await? {
                return Ok(Some(favicon));
            }
        }

        if self.config.throw_on_not_found {
            Err(FetchError::NotFound(url.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Not-found handling for collection fetches, mirroring `not_found`.
    async fn collection_not_found(&self, url: &str) -> crate::Result<FaviconCollection> {
        for name in &self.config.fallbacks {
            tracing::debug!(url, fallback = name.as_str(), "trying fallback driver");
            let driver = resolve(&self.ctx, name)?;

            let favicons = fetch_all_via_fallback(driver, url.to_string()).await?;
            if !favicons.is_empty() {
                return Ok(favicons);
            }
        }

        if self.config.throw_on_not_found {
            Err(FetchError::NotFound(url.to_string()))
        } else {
            Ok(FaviconCollection::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_config_defaults() {
        let config = DriverConfig::default();
        assert!(config.fallbacks.is_empty());
        assert!(!config.throw_on_not_found);
        assert!(config.use_cache);
    }

    #[test]
    fn test_fetched_or_accessors() {
        let found: FetchedOr<i32, &str> = FetchedOr::Found(7);
        assert_eq!(found.clone().found(), Some(7));
        assert_eq!(found.default_value(), None);

        let default: FetchedOr<i32, &str> = FetchedOr::Default("fallback");
        assert_eq!(default.clone().found(), None);
        assert_eq!(default.default_value(), Some("fallback"));
    }

    #[test]
    fn test_build_http_client_with_timeouts() {
        let config = HttpConfig {
            timeout: 5,
            connect_timeout: 2,
            user_agent: Some("favicon-scout-test/1.0".to_string()),
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_without_timeouts() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_builtin_driver_table() {
        assert!(BUILTIN_DRIVERS.contains(&"http"));
        assert!(BUILTIN_DRIVERS.contains(&"duck-duck-go"));
        assert_eq!(BUILTIN_DRIVERS.len(), 6);
    }
}
