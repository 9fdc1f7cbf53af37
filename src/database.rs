//! # Local Key-Value Store
//!
//! Opaque, namespaced string storage that every repository persists through.
//! Values are plain strings; collections are stored as JSON documents and
//! rewritten in full on every change.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added in-memory store for tests and demos
//! - 1.0.0: SQLite-backed store with a single `kv` table

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// A namespaced storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub namespace: &'static str,
    pub name: &'static str,
}

impl StoreKey {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        StoreKey { namespace, name }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Every key the application persists
pub mod keys {
    use super::StoreKey;

    pub const PLANTS: StoreKey = StoreKey::new("plants_prefs", "plants_list");
    pub const NOTIFICATIONS: StoreKey = StoreKey::new("notification_prefs", "notifications_list");
    pub const USER_PLANT_IDS: StoreKey = StoreKey::new("user_plants", "user_plant_ids");
    pub const THEME: StoreKey = StoreKey::new("settings", "theme_preference");
    pub const USER_NAME: StoreKey = StoreKey::new("settings", "user_name");
    pub const USER_EMAIL: StoreKey = StoreKey::new("settings", "user_email");
    pub const AVATAR_URI: StoreKey = StoreKey::new("settings", "avatar_uri");
    pub const ONBOARDING_SHOWN: StoreKey = StoreKey::new("onboarding_prefs", "onboarding_shown");
    pub const PERIODIC_WORK: StoreKey = StoreKey::new("scheduler", "periodic_work");
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: StoreKey) -> Result<Option<String>>;

    async fn put(&self, key: StoreKey, value: &str) -> Result<()>;

    async fn remove(&self, key: StoreKey) -> Result<()>;

    /// Read a string set. A missing entry is the empty set.
    async fn get_string_set(&self, key: StoreKey) -> Result<BTreeSet<String>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow!("Corrupt string set under {}: {}", key, e)),
            None => Ok(BTreeSet::new()),
        }
    }

    async fn put_string_set(&self, key: StoreKey, values: &BTreeSet<String>) -> Result<()> {
        let raw = serde_json::to_string(values)?;
        self.put(key, &raw).await
    }

    /// Read a boolean flag. Missing or unrecognised values read as `false`.
    async fn get_bool(&self, key: StoreKey) -> Result<bool> {
        Ok(self.get(key).await?.as_deref() == Some("true"))
    }

    async fn put_bool(&self, key: StoreKey, value: bool) -> Result<()> {
        self.put(key, if value { "true" } else { "false" }).await
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (namespace, key)
)";

/// SQLite-backed store
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<sqlite::Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`. `":memory:"` gives a private in-memory database.
    pub async fn new(path: &str) -> Result<Self> {
        let connection = sqlite::open(path)
            .map_err(|e| anyhow!("Failed to open database {}: {}", path, e))?;
        connection.execute(SCHEMA)?;
        info!("Opened key-value store at {path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn with_connection<T>(&self, f: impl FnOnce(&sqlite::Connection) -> Result<T>) -> Result<T> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))?;
        f(&connection)
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: StoreKey) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let mut statement =
                conn.prepare("SELECT value FROM kv WHERE namespace = ? AND key = ?")?;
            statement.bind((1, key.namespace))?;
            statement.bind((2, key.name))?;

            if let sqlite::State::Row = statement.next()? {
                Ok(Some(statement.read::<String, _>(0)?))
            } else {
                Ok(None)
            }
        })
    }

    async fn put(&self, key: StoreKey, value: &str) -> Result<()> {
        self.with_connection(|conn| {
            let mut statement = conn
                .prepare("INSERT OR REPLACE INTO kv (namespace, key, value) VALUES (?, ?, ?)")?;
            statement.bind((1, key.namespace))?;
            statement.bind((2, key.name))?;
            statement.bind((3, value))?;
            while let sqlite::State::Row = statement.next()? {}
            debug!("Wrote {} bytes to {key}", value.len());
            Ok(())
        })
    }

    async fn remove(&self, key: StoreKey) -> Result<()> {
        self.with_connection(|conn| {
            let mut statement = conn.prepare("DELETE FROM kv WHERE namespace = ? AND key = ?")?;
            statement.bind((1, key.namespace))?;
            statement.bind((2, key.name))?;
            while let sqlite::State::Row = statement.next()? {}
            Ok(())
        })
    }
}

/// Process-local store, lost on exit
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>> {
        Ok(self.entries.get(&key).map(|v| v.clone()))
    }

    async fn put(&self, key: StoreKey, value: &str) -> Result<()> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StoreKey) -> Result<()> {
        self.entries.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Store whose every operation fails, for exercising recovery paths
    pub struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, key: StoreKey) -> Result<Option<String>> {
            Err(anyhow!("read of {key} failed"))
        }

        async fn put(&self, key: StoreKey, _value: &str) -> Result<()> {
            Err(anyhow!("write of {key} failed"))
        }

        async fn remove(&self, key: StoreKey) -> Result<()> {
            Err(anyhow!("remove of {key} failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_put_get_remove() {
        let db = Database::new(":memory:").await.unwrap();

        assert_eq!(db.get(keys::USER_NAME).await.unwrap(), None);

        db.put(keys::USER_NAME, "Ada").await.unwrap();
        assert_eq!(db.get(keys::USER_NAME).await.unwrap().as_deref(), Some("Ada"));

        db.put(keys::USER_NAME, "Grace").await.unwrap();
        assert_eq!(db.get(keys::USER_NAME).await.unwrap().as_deref(), Some("Grace"));

        db.remove(keys::USER_NAME).await.unwrap();
        assert_eq!(db.get(keys::USER_NAME).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let db = Database::new(":memory:").await.unwrap();
        let a = StoreKey::new("one", "same");
        let b = StoreKey::new("two", "same");

        db.put(a, "first").await.unwrap();
        db.put(b, "second").await.unwrap();

        assert_eq!(db.get(a).await.unwrap().as_deref(), Some("first"));
        assert_eq!(db.get(b).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let path = std::env::temp_dir().join(format!("plantastic-{}.db", uuid::Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();

        {
            let db = Database::new(&path_str).await.unwrap();
            db.put(keys::THEME, "DARK").await.unwrap();
        }

        let reopened = Database::new(&path_str).await.unwrap();
        assert_eq!(reopened.get(keys::THEME).await.unwrap().as_deref(), Some("DARK"));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_string_set_helpers() {
        let store = MemoryStore::new();
        assert!(store.get_string_set(keys::USER_PLANT_IDS).await.unwrap().is_empty());

        let ids: BTreeSet<String> = ["b", "a", "b"].iter().map(|s| s.to_string()).collect();
        store.put_string_set(keys::USER_PLANT_IDS, &ids).await.unwrap();

        let raw = store.get(keys::USER_PLANT_IDS).await.unwrap().unwrap();
        assert_eq!(raw, r#"["a","b"]"#);
        assert_eq!(store.get_string_set(keys::USER_PLANT_IDS).await.unwrap(), ids);
    }

    #[tokio::test]
    async fn test_corrupt_string_set_is_error() {
        let store = MemoryStore::new();
        store.put(keys::USER_PLANT_IDS, "{not json").await.unwrap();
        assert!(store.get_string_set(keys::USER_PLANT_IDS).await.is_err());
    }

    #[tokio::test]
    async fn test_bool_helpers() {
        let store = MemoryStore::new();
        assert!(!store.get_bool(keys::ONBOARDING_SHOWN).await.unwrap());

        store.put_bool(keys::ONBOARDING_SHOWN, true).await.unwrap();
        assert!(store.get_bool(keys::ONBOARDING_SHOWN).await.unwrap());

        store.put(keys::ONBOARDING_SHOWN, "yes").await.unwrap();
        assert!(!store.get_bool(keys::ONBOARDING_SHOWN).await.unwrap());
    }
}
