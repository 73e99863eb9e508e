//! Persistence for suggestions and approved edits.
//!
//! The crate never talks to a global store. A [`KeyValueStore`] is handed
//! to [`RecordStore`], which exposes the two collections as typed values.
//!
//! # Usage
//!
//! ```
//! use redline::store::{MemoryStore, RecordStore};
//!
//! let records = RecordStore::new(MemoryStore::new());
//! assert!(records.load_suggestions().is_empty());
//! ```

mod collections;
mod file;
mod kv;
mod memory;

pub use collections::{RecordStore, APPROVED_EDITS_KEY, SUGGESTIONS_KEY};
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
