use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use bakery_core::{KeyValueStore, KeyValueStoreError};

/// Side-channel store backed by a single `kv_store` table.
pub struct SqliteKeyValueStore {
    connection: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    pub fn new(path: &Path) -> Result<Self, KeyValueStoreError> {
        let connection = Connection::open(path).map_err(unavailable)?;

        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;

        Ok(store)
    }

    pub fn in_memory() -> Result<Self, KeyValueStoreError> {
        let connection = Connection::open_in_memory().map_err(unavailable)?;

        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;

        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), KeyValueStoreError> {
        let connection = self.connection.lock().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );",
            )
            .map_err(unavailable)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .map(|_| ())
            .map_err(|error| KeyValueStoreError::Write {
                key: key.to_string(),
                message: error.to_string(),
            })
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map(|_| ())
            .map_err(|error| KeyValueStoreError::Write {
                key: key.to_string(),
                message: error.to_string(),
            })
    }
}

fn unavailable(error: rusqlite::Error) -> KeyValueStoreError {
    KeyValueStoreError::Unavailable {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_returns_none() {
        let store = SqliteKeyValueStore::in_memory().unwrap();

        assert_eq!(store.get("shopStatus").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = SqliteKeyValueStore::in_memory().unwrap();

        store.set("shopStatus", "open").unwrap();
        store.set("shopStatus", "closed").unwrap();

        assert_eq!(store.get("shopStatus").unwrap().as_deref(), Some("closed"));
    }

    #[test]
    fn remove_deletes_value_and_tolerates_missing_keys() {
        let store = SqliteKeyValueStore::in_memory().unwrap();
        store.set("currentSession", "{}").unwrap();

        store.remove("currentSession").unwrap();
        store.remove("currentSession").unwrap();

        assert_eq!(store.get("currentSession").unwrap(), None);
    }

    #[test]
    fn values_survive_reopening_the_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("bakery.db");

        {
            let store = SqliteKeyValueStore::new(&path).unwrap();
            store.set("shopHistory", "[]").unwrap();
        }

        let reopened = SqliteKeyValueStore::new(&path).unwrap();
        assert_eq!(reopened.get("shopHistory").unwrap().as_deref(), Some("[]"));
    }
}
