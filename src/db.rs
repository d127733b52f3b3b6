use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Durable string-keyed storage for serialized values.
///
/// Keys are global (`osrs-accounts`, `osrs-settings`) or account scoped
/// (`osrs-checklist-<id>`). No transactions, last writer wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        setup_database(&conn)?;
        tracing::debug!("Opened key-value store at {}", path.display());

        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn verify_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases silently keep "memory"
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Volatile store, used by tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// TYPED ACCESS
// ============================================================================

/// Read a JSON value.
///
/// A missing key yields `default()`. A value that does not deserialize as `T`
/// is logged and also yields `default()`; only storage failures are errors.
pub fn load_or_default<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = store.get(key)? else {
        return Ok(default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Ignoring malformed value under '{}': {}", key, e);
            Ok(default())
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize value for '{}'", key))?;
    store.set(key, &json)?;
    tracing::debug!("Wrote '{}' ({} bytes)", key, json.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        store.set("osrs-settings", r#"{"countThirdAge":true}"#).unwrap();
        store.set("osrs-settings", r#"{"countThirdAge":false}"#).unwrap();

        assert_eq!(
            store.get("osrs-settings").unwrap().as_deref(),
            Some(r#"{"countThirdAge":false}"#)
        );
        assert_eq!(store.verify_count().unwrap(), 1);
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tracker.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("osrs-checklist-a", r#"["x","y"]"#).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("osrs-checklist-a").unwrap().as_deref(),
            Some(r#"["x","y"]"#)
        );
    }

    #[test]
    fn test_load_or_default_missing_and_malformed() {
        let store = MemoryStore::new().with_value("bad", "{{{");

        let missing: Vec<String> = load_or_default(&store, "missing", || vec!["d".to_string()]).unwrap();
        let malformed: Vec<String> = load_or_default(&store, "bad", Vec::new).unwrap();

        assert_eq!(missing, vec!["d".to_string()]);
        assert!(malformed.is_empty());
    }

    #[test]
    fn test_load_or_default_shape_mismatch_falls_back() {
        // Valid JSON, wrong shape
        let store = MemoryStore::new().with_value("ids", r#"{"a":1}"#);

        let ids: Vec<String> = load_or_default(&store, "ids", Vec::new).unwrap();

        assert!(ids.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();

        save_json(&mut store, "ids", &vec!["a", "b"]).unwrap();
        let ids: Vec<String> = load_or_default(&store, "ids", Vec::new).unwrap();

        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
