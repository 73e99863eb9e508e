//! Merging approved edits onto record snapshots.
//!
//! The canonical record is never modified in place. [`EditApplier`]
//! returns a merged copy with every approved edit for the record folded in,
//! oldest approval first.

mod applier;
mod report;

pub use applier::{merge_edits, EditApplier, Record};
pub use report::{FieldChange, MergeReport};
