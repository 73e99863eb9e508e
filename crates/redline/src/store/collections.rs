//! Typed whole-collection access to suggestions and approved edits.

use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RedlineError, Result};
use crate::suggestion::{ApprovedEdit, EditSuggestion};

use super::kv::KeyValueStore;

/// Default key of the suggestions collection.
pub const SUGGESTIONS_KEY: &str = "redline.edit_suggestions";

/// Default key of the approved-edits collection.
pub const APPROVED_EDITS_KEY: &str = "redline.approved_edits";

/// Typed adapter over a [`KeyValueStore`] holding the two collections.
///
/// Each collection is a JSON array stored under one key and is always read
/// and written whole. A missing or undecodable value reads as an empty
/// collection.
///
/// Read-modify-write cycles within one process are serialized through
/// [`RecordStore::lock`]. Nothing guards against other processes writing
/// the same store.
pub struct RecordStore<S> {
    store: S,
    suggestions_key: String,
    approved_edits_key: String,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap a store using the default collection keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, SUGGESTIONS_KEY, APPROVED_EDITS_KEY)
    }

    /// Wrap a store using custom collection keys.
    pub fn with_keys(
        store: S,
        suggestions_key: impl Into<String>,
        approved_edits_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            suggestions_key: suggestions_key.into(),
            approved_edits_key: approved_edits_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying key-value store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn suggestions_key(&self) -> &str {
        &self.suggestions_key
    }

    pub fn approved_edits_key(&self) -> &str {
        &self.approved_edits_key
    }

    /// Acquire the in-process write lock for a read-modify-write cycle.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All suggestions. Store failures are logged and read as empty.
    pub fn load_suggestions(&self) -> Vec<EditSuggestion> {
        self.read_or_empty(&self.suggestions_key)
    }

    /// All approved edits. Store failures are logged and read as empty.
    pub fn load_approved_edits(&self) -> Vec<ApprovedEdit> {
        self.read_or_empty(&self.approved_edits_key)
    }

    /// All suggestions, failing if the store itself cannot be read.
    ///
    /// Undecodable contents still read as empty; only a failed `get`
    /// is an error. Mutations load through this so that a transient read
    /// failure is never followed by overwriting the collection.
    pub fn try_load_suggestions(&self) -> Result<Vec<EditSuggestion>> {
        self.read_collection(&self.suggestions_key)
    }

    /// All approved edits, failing if the store itself cannot be read.
    pub fn try_load_approved_edits(&self) -> Result<Vec<ApprovedEdit>> {
        self.read_collection(&self.approved_edits_key)
    }

    /// Replace the suggestions collection.
    pub fn save_suggestions(&self, suggestions: &[EditSuggestion]) -> Result<()> {
        self.write_collection(&self.suggestions_key, suggestions)
    }

    /// Replace the approved-edits collection.
    pub fn save_approved_edits(&self, edits: &[ApprovedEdit]) -> Result<()> {
        self.write_collection(&self.approved_edits_key, edits)
    }

    /// Remove both collections.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        self.store
            .remove(&self.suggestions_key)
            .map_err(|e| persistence("remove", &self.suggestions_key, e))?;
        self.store
            .remove(&self.approved_edits_key)
            .map_err(|e| persistence("remove", &self.approved_edits_key, e))?;
        tracing::info!("Cleared suggestion and approved-edit collections");
        Ok(())
    }

    fn read_or_empty<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_collection(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Failed to read collection, treating as empty");
            Vec::new()
        })
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => return Err(persistence("read", key, e)),
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable collection");
                Ok(Vec::new())
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(key, &raw).map_err(|e| {
            let err = persistence("write", key, e);
            tracing::warn!(key, error = %err, "Failed to write collection");
            err
        })
    }
}

fn persistence(action: &str, key: &str, cause: RedlineError) -> RedlineError {
    let detail = match cause {
        RedlineError::Persistence(message) => message,
        other => other.to_string(),
    };
    RedlineError::Persistence(format!("Failed to {} '{}': {}", action, key, detail))
}
