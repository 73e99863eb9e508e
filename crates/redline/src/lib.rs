//! Redline: collaborative edit suggestions for shared records.
//!
//! Users propose field-level edits to a record, other users vote on the
//! proposals, and a reviewer approves or rejects each one. Approved edits
//! are merged onto the canonical record on read.
//!
//! # Core Principles
//!
//! - **Non-destructive**: The canonical record is never modified; merges
//!   return a new value
//! - **Last approval wins**: When approved edits touch the same field, the
//!   most recently approved value is kept
//! - **Injected storage**: All state lives behind a [`KeyValueStore`] passed
//!   in at construction
//!
//! # Example
//!
//! ```
//! use redline::{FieldEdits, MemoryStore, StaticNameResolver, SuggestionService};
//! use serde_json::json;
//!
//! let service = SuggestionService::new(MemoryStore::new(), StaticNameResolver::new());
//!
//! let mut edits = FieldEdits::new();
//! edits.insert("name".to_string(), json!("Tasca do Chico"));
//! let suggestion = service.submit("r1", "alice", edits, None).unwrap();
//! service.approve(&suggestion.id, "reviewer").unwrap();
//!
//! let snapshot = json!({"name": "Tasca", "price": 9}).as_object().unwrap().clone();
//! let merged = service.apply(&snapshot, "r1");
//! assert_eq!(merged["name"], "Tasca do Chico");
//! assert_eq!(merged["price"], 9);
//! ```

pub mod apply;
pub mod error;
pub mod identity;
pub mod store;
pub mod suggestion;

pub use apply::{merge_edits, EditApplier, FieldChange, MergeReport, Record};
pub use error::{RedlineError, Result};
pub use identity::{
    Clock, DisplayNameResolver, GeneratedNameResolver, ManualClock, StaticNameResolver,
    SystemClock,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, RecordStore};
pub use suggestion::{
    ApprovedEdit, EditSuggestion, FieldEdits, Review, ServiceConfig, StatusFilter,
    SuggestionCounts, SuggestionService, SuggestionStatus, VoteDirection, Votes,
};
