use std::collections::HashMap;
use std::sync::Mutex;

use bakery_core::{KeyValueStore, KeyValueStoreError};

/// Process-local store. Nothing survives the process; useful for previews
/// and tests.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = InMemoryKeyValueStore::new();

        assert!(store.is_empty());
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn seeded_entries_are_readable() {
        let store = InMemoryKeyValueStore::with_entries([("shopStatus", "open"), ("cart", "[]")]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("shopStatus").unwrap().as_deref(), Some("open"));
    }

    #[test]
    fn remove_forgets_value() {
        let store = InMemoryKeyValueStore::new();
        store.set("cart", "[]").unwrap();

        store.remove("cart").unwrap();

        assert!(store.is_empty());
    }
}
