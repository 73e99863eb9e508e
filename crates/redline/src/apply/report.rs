//! Audit of a merge of approved edits onto a record.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of merging approved edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Number of approved edits folded in.
    pub edits_applied: usize,

    /// Field values proposed as `null` and therefore left untouched.
    pub nulls_skipped: usize,

    /// Each field overwrite that changed the record, in merge order.
    pub changes: Vec<FieldChange>,
}

/// A single field overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field that was changed.
    pub field: String,

    /// Value before the overwrite; `None` if the field was absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,

    /// Value after the overwrite.
    pub value: Value,

    /// Suggestion the value came from.
    pub suggestion_id: String,

    /// When that suggestion was approved.
    pub applied_at: DateTime<Utc>,
}

impl MergeReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the merge changed nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Distinct fields that changed.
    pub fn fields_changed(&self) -> BTreeSet<&str> {
        self.changes.iter().map(|c| c.field.as_str()).collect()
    }

    /// The change that produced a field's final value, if any.
    pub fn winner(&self, field: &str) -> Option<&FieldChange> {
        self.changes.iter().rev().find(|c| c.field == field)
    }

    pub(crate) fn add_change(&mut self, change: FieldChange) {
        self.changes.push(change);
    }
}
