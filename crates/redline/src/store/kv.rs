//! The key-value capability the rest of the crate persists through.

use std::sync::Arc;

use crate::error::Result;

/// Durable, string-keyed storage of textual values.
///
/// Every backend implements this trait. Values are opaque text; the
/// collection layer decides how to encode them.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
