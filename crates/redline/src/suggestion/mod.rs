//! Edit suggestions and their review lifecycle.
//!
//! A suggestion proposes new values for some fields of a record. Other
//! users vote on it, and a reviewer approves or rejects it exactly once.
//!
//! # Usage
//!
//! ```
//! use redline::suggestion::{ServiceConfig, StatusFilter, SuggestionService, SuggestionStatus};
//! use redline::{FieldEdits, MemoryStore, StaticNameResolver};
//! use serde_json::json;
//!
//! let service = SuggestionService::with_config(
//!     MemoryStore::new(),
//!     StaticNameResolver::new(),
//!     ServiceConfig::new().with_votes_on_decided(false),
//! );
//!
//! let mut edits = FieldEdits::new();
//! edits.insert("phone".to_string(), json!("+351 210 000 000"));
//! let suggestion = service.submit("r1", "alice", edits, None).unwrap();
//!
//! service.reject(&suggestion.id, "reviewer", Some("Unverified")).unwrap();
//! let rejected = service.list("r1", SuggestionStatus::Rejected);
//! assert_eq!(rejected.len(), 1);
//! assert!(service.list("r1", StatusFilter::All).len() == 1);
//! ```

mod service;
mod suggestion;
mod votes;

pub use service::{ServiceConfig, SuggestionCounts, SuggestionService};
pub use suggestion::{
    ApprovedEdit, EditSuggestion, FieldEdits, Review, StatusFilter, SuggestionStatus,
};
pub use votes::{VoteDirection, Votes};
