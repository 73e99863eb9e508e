//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use redline::{FieldEdits, KeyValueStore, MemoryStore, RedlineError, Result};
use serde_json::Value;

/// Memory store whose reads and writes can be made to fail on demand.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    /// Only writes to this key fail, when set.
    fail_key: std::sync::Mutex<Option<String>>,
    /// Key, writes still allowed, then writes to fail.
    fail_window: std::sync::Mutex<Option<(String, usize, usize)>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail writes to a single key only.
    pub fn fail_writes_to(&self, key: &str) {
        *self.fail_key.lock().unwrap() = Some(key.to_string());
    }

    /// Let the next `allowed` writes to `key` through, then fail `failing`
    /// writes to it, then succeed again.
    pub fn fail_writes_window(&self, key: &str, allowed: usize, failing: usize) {
        *self.fail_window.lock().unwrap() = Some((key.to_string(), allowed, failing));
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).unwrap()
    }

    fn write_fails(&self, key: &str) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            || self.fail_key.lock().unwrap().as_deref() == Some(key)
            || self.window_fails(key)
    }

    fn window_fails(&self, key: &str) -> bool {
        let mut window = self.fail_window.lock().unwrap();
        match window.as_mut() {
            Some((target, allowed, _)) if target == key && *allowed > 0 => {
                *allowed -= 1;
                false
            }
            Some((target, _, failing)) if target == key && *failing > 0 => {
                *failing -= 1;
                true
            }
            _ => false,
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RedlineError::Persistence("read unavailable".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.write_fails(key) {
            return Err(RedlineError::Persistence("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.write_fails(key) {
            return Err(RedlineError::Persistence("remove unavailable".to_string()));
        }
        self.inner.remove(key)
    }
}

/// Build an edit map from a JSON object.
pub fn edits(value: Value) -> FieldEdits {
    serde_json::from_value(value).expect("edits must be a JSON object")
}

/// Build a record snapshot from a JSON object.
pub fn record(value: Value) -> redline::Record {
    value
        .as_object()
        .cloned()
        .expect("record must be a JSON object")
}
