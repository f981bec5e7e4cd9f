//! SQLite-backed cache store
//!
//! Persists cache entries as JSON text with an absolute expiry timestamp.
//! Expired rows are deleted lazily on read.

use crate::cache::store::{CacheStore, CacheStoreError, StoreResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// SQLite cache store backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the cache database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory cache database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS favicon_cache (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        );
    ",
    )?;
    Ok(())
}

impl CacheStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn.lock().map_err(|_| CacheStoreError::Poisoned)?;

        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT value, expires_at FROM favicon_cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((_, expires_at)) if expires_at <= Utc::now().timestamp() => {
                conn.execute("DELETE FROM favicon_cache WHERE key = ?1", params![key])?;
                Ok(None)
            }
            Some((text, _)) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| CacheStoreError::Serialization(e.to_string())),
        }
    }

    fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| CacheStoreError::Poisoned)?;

        let text = serde_json::to_string(&value)
            .map_err(|e| CacheStoreError::Serialization(e.to_string()))?;
        // Oversized TTLs saturate rather than wrapping into the past.
        let expires_at = Utc::now()
            .timestamp()
            .saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));

        conn.execute(
            "INSERT OR REPLACE INTO favicon_cache (key, value, expires_at) VALUES (?1, ?2, ?3)",
            params![key, text, expires_at],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_then_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .put("k", json!({"favicon_url": "https://example.com/f.ico"}), Duration::from_secs(60))
            .unwrap();

        assert_eq!(
            store.get("k").unwrap(),
            Some(json!({"favicon_url": "https://example.com/f.ico"}))
        );
    }

    #[test]
    fn test_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("k", json!(1), Duration::ZERO).unwrap();

        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_wrap_into_the_past() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .put("k", json!(1), Duration::from_secs(u64::MAX))
            .unwrap();

        assert_eq!(store.get("k").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put("k", json!("old"), Duration::from_secs(60)).unwrap();
        store.put("k", json!("new"), Duration::from_secs(60)).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(json!("new")));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put("k", json!(42), Duration::from_secs(60)).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(42)));
    }
}
