//! Favicon caching
//!
//! This module builds deterministic cache keys from site URLs and bridges
//! [`Favicon`] values to and from a pluggable [`CacheStore`] in a stable
//! JSON wire shape. Entries written by older releases as a bare URL string
//! are still read back (legacy format migration).

mod sqlite;
mod store;

pub use sqlite::SqliteStore;
pub use store::{CacheStore, CacheStoreError, MemoryStore, StoreResult};

use crate::favicon::{Favicon, FaviconCollection, IconType};
use crate::url::strip_scheme;
use crate::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Suffix appended to the single-entry key for "fetch all" collections.
const COLLECTION_SUFFIX: &str = ".collection";

/// Wire shape of one cached favicon entry.
#[derive(Debug, Serialize, Deserialize)]
struct CachedFavicon {
    favicon_url: String,
    icon_size: Option<u32>,
    icon_type: IconType,
}

impl CachedFavicon {
    fn from_favicon(favicon: &Favicon) -> Self {
        Self {
            favicon_url: favicon.favicon_url().to_string(),
            icon_size: favicon.icon_size(),
            icon_type: favicon.icon_type(),
        }
    }

    fn into_favicon(self, url: &str) -> Favicon {
        Favicon::from_cache(url, self.favicon_url)
            .with_icon_type(self.icon_type)
            .with_icon_size(self.icon_size)
    }
}

/// Reads and writes favicons through a [`CacheStore`] under prefixed keys.
pub struct FaviconCache {
    store: Arc<dyn CacheStore>,
    prefix: String,
}

impl FaviconCache {
    pub fn new(store: Arc<dyn CacheStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Builds the cache key for a site's single favicon entry.
    ///
    /// The URL's scheme is stripped first, so the `http://` and `https://`
    /// variants of a site share one cache entry. That collapse is the
    /// documented behavior, not an accident.
    pub fn build_key(&self, url: &str) -> String {
        format!("{}.{}", self.prefix, strip_scheme(url))
    }

    /// Builds the cache key for a site's favicon collection entry.
    pub fn build_collection_key(&self, url: &str) -> String {
        format!("{}{}", self.build_key(url), COLLECTION_SUFFIX)
    }

    /// Reads the cached favicon for a site, if one exists.
    ///
    /// Values in the legacy bare-string shape are migrated on the fly to a
    /// favicon with an unknown type and no size.
    pub fn read_single(&self, url: &str) -> crate::Result<Option<Favicon>> {
        let value = self.store.get(&self.build_key(url))?;

        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(favicon_url)) => {
                tracing::debug!(url, "migrating legacy cache entry");
                Ok(Some(Favicon::from_cache(url, favicon_url)))
            }
            Some(value) => {
                let cached: CachedFavicon = serde_json::from_value(value)
                    .map_err(|e| FetchError::CacheFormat(e.to_string()))?;
                Ok(Some(cached.into_favicon(url)))
            }
        }
    }

    /// Reads the cached favicon collection for a site, if one exists.
    pub fn read_collection(&self, url: &str) -> crate::Result<Option<FaviconCollection>> {
        let value = self.store.get(&self.build_collection_key(url))?;

        match value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let cached: Vec<CachedFavicon> = serde_json::from_value(value)
                    .map_err(|e| FetchError::CacheFormat(e.to_string()))?;
                let favicons = cached
                    .into_iter()
                    .map(|entry| entry.into_favicon(url))
                    .collect();
                Ok(Some(FaviconCollection::make_from_cache(favicons)))
            }
        }
    }

    /// Writes a favicon to the cache.
    ///
    /// A favicon that itself came from the cache is not re-written unless
    /// `force` is set, so cache hits do not silently reset entry TTLs.
    pub fn write_single(&self, favicon: &Favicon, ttl: Duration, force: bool) -> crate::Result<()> {
        if !force && favicon.retrieved_from_cache() {
            return Ok(());
        }

        let value = serde_json::to_value(CachedFavicon::from_favicon(favicon))
            .map_err(|e| FetchError::CacheFormat(e.to_string()))?;

        self.store.put(&self.build_key(favicon.url()), value, ttl)?;
        Ok(())
    }

    /// Writes a favicon collection to the cache.
    ///
    /// Empty collections are never cached, and the same force/origin rule as
    /// [`write_single`](Self::write_single) applies.
    pub fn write_collection(
        &self,
        favicons: &FaviconCollection,
        ttl: Duration,
        force: bool,
    ) -> crate::Result<()> {
        let first = match favicons.first() {
            Some(first) => first,
            None => return Ok(()),
        };

        if !force && favicons.retrieved_from_cache() {
            return Ok(());
        }

        let entries: Vec<CachedFavicon> =
            favicons.iter().map(CachedFavicon::from_favicon).collect();
        let value = serde_json::to_value(entries)
            .map_err(|e| FetchError::CacheFormat(e.to_string()))?;

        self.store
            .put(&self.build_collection_key(first.url()), value, ttl)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(3600);

    fn cache() -> FaviconCache {
        FaviconCache::new(Arc::new(MemoryStore::new()), "favicon-scout")
    }

    /// Store wrapper that counts underlying writes.
    struct CountingStore {
        inner: MemoryStore,
        puts: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                puts: AtomicUsize::new(0),
            }
        }
    }

    impl CacheStore for CountingStore {
        fn get(&self, key: &str) -> StoreResult<Option<Value>> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, value, ttl)
        }
    }

    #[test]
    fn test_build_key_is_deterministic() {
        let cache = cache();
        assert_eq!(
            cache.build_key("https://example.com"),
            cache.build_key("https://example.com")
        );
    }

    #[test]
    fn test_build_key_collapses_schemes() {
        let cache = cache();
        assert_eq!(
            cache.build_key("https://example.com"),
            cache.build_key("http://example.com")
        );
        assert_eq!(cache.build_key("https://example.com"), "favicon-scout.example.com");
    }

    #[test]
    fn test_build_collection_key_appends_suffix() {
        let cache = cache();
        assert_eq!(
            cache.build_collection_key("https://example.com"),
            "favicon-scout.example.com.collection"
        );
    }

    #[test]
    fn test_read_single_absent() {
        assert!(cache().read_single("https://example.com").unwrap().is_none());
    }

    #[test]
    fn test_single_round_trip() {
        let cache = cache();
        let favicon = Favicon::new("https://example.com", "https://example.com/f.png")
            .with_icon_type(IconType::ShortcutIcon)
            .with_icon_size(Some(32));

        cache.write_single(&favicon, TTL, false).unwrap();
        let read = cache.read_single("https://example.com").unwrap().unwrap();

        assert_eq!(read.favicon_url(), "https://example.com/f.png");
        assert_eq!(read.icon_type(), IconType::ShortcutIcon);
        assert_eq!(read.icon_size(), Some(32));
        assert!(read.retrieved_from_cache());
    }

    #[test]
    fn test_legacy_string_entry_is_migrated() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                "favicon-scout.example.com",
                json!("https://example.com/old.ico"),
                TTL,
            )
            .unwrap();

        let cache = FaviconCache::new(store, "favicon-scout");
        let read = cache.read_single("https://example.com").unwrap().unwrap();

        assert_eq!(read.favicon_url(), "https://example.com/old.ico");
        assert_eq!(read.icon_type(), IconType::Unknown);
        assert_eq!(read.icon_size(), None);
        assert!(read.retrieved_from_cache());
    }

    #[test]
    fn test_cached_favicon_is_not_rewritten() {
        let store = Arc::new(CountingStore::new());
        let cache = FaviconCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, "p");

        let favicon = Favicon::from_cache("https://example.com", "https://example.com/f.ico");
        cache.write_single(&favicon, TTL, false).unwrap();
        cache.write_single(&favicon, TTL, false).unwrap();

        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_force_rewrites_cached_favicon() {
        let store = Arc::new(CountingStore::new());
        let cache = FaviconCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, "p");

        let favicon = Favicon::from_cache("https://example.com", "https://example.com/f.ico");
        cache.write_single(&favicon, TTL, true).unwrap();

        assert_eq!(store.puts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_collection_round_trip_preserves_order() {
        let cache = cache();
        let favicons = FaviconCollection::from_items(vec![
            Favicon::new("https://example.com", "https://example.com/a.ico")
                .with_icon_type(IconType::Icon),
            Favicon::new("https://example.com", "https://example.com/b.png")
                .with_icon_type(IconType::AppleTouchIcon)
                .with_icon_size(Some(180)),
        ]);

        cache.write_collection(&favicons, TTL, false).unwrap();
        let read = cache
            .read_collection("https://example.com")
            .unwrap()
            .unwrap();

        assert!(read.retrieved_from_cache());
        let urls: Vec<_> = read.iter().map(|f| f.favicon_url().to_string()).collect();
        assert_eq!(
            urls,
            vec!["https://example.com/a.ico", "https://example.com/b.png"]
        );
        assert_eq!(read.iter().nth(1).unwrap().icon_size(), Some(180));
    }

    #[test]
    fn test_empty_collection_is_never_cached() {
        let store = Arc::new(CountingStore::new());
        let cache = FaviconCache::new(Arc::clone(&store) as Arc<dyn CacheStore>, "p");

        cache
            .write_collection(&FaviconCollection::new(), TTL, true)
            .unwrap();

        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }
}
