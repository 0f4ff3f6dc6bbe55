use std::collections::HashSet;

use bakery_core::{KeyValueStore, KeyValueStoreError};

use crate::memory::InMemoryKeyValueStore;

/// In-memory store whose writes to the chosen keys always fail.
#[derive(Default)]
pub struct FailingKeyValueStore {
    inner: InMemoryKeyValueStore,
    failing_keys: HashSet<String>,
    unreadable: bool,
}

impl FailingKeyValueStore {
    pub fn failing_writes_to(keys: &[&str]) -> Self {
        Self {
            failing_keys: keys.iter().map(|key| key.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every read reports the store as unavailable.
    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &InMemoryKeyValueStore {
        &self.inner
    }

    fn check_writable(&self, key: &str) -> Result<(), KeyValueStoreError> {
        if self.failing_keys.contains(key) {
            return Err(KeyValueStoreError::Write {
                key: key.to_string(),
                message: "disk full".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        if self.unreadable {
            return Err(KeyValueStoreError::Unavailable {
                message: "storage offline".to_string(),
            });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.check_writable(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.check_writable(key)?;
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_listed_keys_fail() {
        let store = FailingKeyValueStore::failing_writes_to(&["shopHistory"]);

        assert!(store.set("shopStatus", "open").is_ok());
        assert!(matches!(
            store.set("shopHistory", "[]"),
            Err(KeyValueStoreError::Write { .. })
        ));
        assert_eq!(store.get("shopStatus").unwrap().as_deref(), Some("open"));
        assert!(store.get("shopHistory").unwrap().is_none());
    }

    #[test]
    fn unreadable_store_fails_reads() {
        let store = FailingKeyValueStore::unreadable();

        assert!(matches!(
            store.get("cart"),
            Err(KeyValueStoreError::Unavailable { .. })
        ));
    }
}
