//! Cache store trait and the in-memory implementation
//!
//! The cache store is an external collaborator from the resolution engine's
//! point of view: a key-value map with per-entry TTLs holding JSON values.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur inside a cache store backend
#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache store lock poisoned")]
    Poisoned,
}

/// Result type for cache store operations
pub type StoreResult<T> = Result<T, CacheStoreError>;

/// A key-value store with per-entry time-to-live.
///
/// Implementations must be safe for concurrent use; expired entries are
/// treated as absent.
pub trait CacheStore: Send + Sync {
    /// Looks up a value, returning `None` for missing or expired keys.
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Inserts or replaces a value with the given time-to-live.
    fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()>;
}

/// In-memory cache store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (Value, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// TTLs too large to represent saturate to the far future instead of
/// wrapping into the past.
fn expiry_from_ttl(ttl: Duration) -> DateTime<Utc> {
    let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

    ChronoDuration::try_seconds(seconds)
        .and_then(|offset| Utc::now().checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheStoreError::Poisoned)?;

        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Utc::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheStoreError::Poisoned)?;

        entries.insert(key.to_string(), (value, expiry_from_ttl(ttl)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let store = MemoryStore::new();
        store
            .put("key", json!({"a": 1}), Duration::from_secs(60))
            .unwrap();

        assert_eq!(store.get("key").unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("key", json!(1), Duration::from_secs(60)).unwrap();
        store.put("key", json!(2), Duration::from_secs(60)).unwrap();

        assert_eq!(store.get("key").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let store = MemoryStore::new();
        store.put("key", json!(1), Duration::ZERO).unwrap();

        assert!(store.get("key").unwrap().is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_wrap_into_the_past() {
        let store = MemoryStore::new();
        store
            .put("key", json!(1), Duration::from_secs(u64::MAX))
            .unwrap();

        assert_eq!(store.get("key").unwrap(), Some(json!(1)));
    }
}
