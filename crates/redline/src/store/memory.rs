//! Volatile in-process key-value store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::Result;

use super::kv::KeyValueStore;

/// In-memory storage backend.
///
/// Nothing touches disk. Ideal for testing and prototyping.
///
/// # Example
///
/// ```
/// use redline::store::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("greeting", "hello").unwrap();
/// assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key))
    }
}
