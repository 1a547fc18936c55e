//! In-memory storage implementation
//!
//! Used for tests and for sessions that should not touch disk.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::KeyValueStore;

/// In-memory implementation of KeyValueStore
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|_| anyhow!("In-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|_| anyhow!("In-memory store lock poisoned"))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.read()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_collection, save_collection};

    #[test]
    fn test_save_and_load() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.load("k").unwrap().is_none());

        store.save("k", b"value").unwrap();
        assert_eq!(store.load("k").unwrap().unwrap(), b"value");

        store.save("k", b"other").unwrap();
        assert_eq!(store.load("k").unwrap().unwrap(), b"other");
    }

    #[test]
    fn test_remove_and_keys() {
        let store = InMemoryKeyValueStore::new();
        store.save("b", b"2").unwrap();
        store.save("a", b"1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let store = InMemoryKeyValueStore::new();
        let items: Vec<String> = load_collection(&store, "nothing").unwrap();
        assert!(items.is_empty());

        save_collection(&store, "names", &["a".to_string(), "b".to_string()]).unwrap();
        let items: Vec<String> = load_collection(&store, "names").unwrap();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let store = InMemoryKeyValueStore::new();
        store.save("names", b"not json").unwrap();
        let err = load_collection::<String>(&store, "names").unwrap_err();
        assert!(err.to_string().contains("names"));
    }
}
