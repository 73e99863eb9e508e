//! Folds approved edits onto record snapshots.

use serde_json::{Map, Value};

use crate::store::{KeyValueStore, RecordStore};
use crate::suggestion::ApprovedEdit;

use super::report::{FieldChange, MergeReport};

/// A record snapshot: field name to JSON value.
pub type Record = Map<String, Value>;

/// Merges a record's approved-edit history onto a snapshot.
///
/// Edits are applied oldest approval first, so for any field touched by
/// several approved suggestions the most recently approved one wins. A
/// `null` proposed value leaves the field untouched.
///
/// Never fails: if the history cannot be read the snapshot comes back
/// unchanged.
pub struct EditApplier<'a, S> {
    records: &'a RecordStore<S>,
}

impl<'a, S: KeyValueStore> EditApplier<'a, S> {
    pub fn new(records: &'a RecordStore<S>) -> Self {
        Self { records }
    }

    /// Approved edits for a record, oldest approval first.
    pub fn history(&self, record_id: &str) -> Vec<ApprovedEdit> {
        let mut history: Vec<_> = self
            .records
            .load_approved_edits()
            .into_iter()
            .filter(|edit| edit.record_id() == record_id)
            .collect();
        history.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        history
    }

    /// Merged copy of `snapshot`.
    pub fn apply(&self, snapshot: &Record, record_id: &str) -> Record {
        self.apply_with_report(snapshot, record_id).0
    }

    /// Merged copy of `snapshot` plus an audit of what changed.
    pub fn apply_with_report(&self, snapshot: &Record, record_id: &str) -> (Record, MergeReport) {
        let history = self.history(record_id);
        let (merged, report) = merge_edits(snapshot, &history);

        tracing::debug!(
            record_id,
            edits = report.edits_applied,
            changes = report.changes.len(),
            "Merged approved edits"
        );
        (merged, report)
    }
}

/// Fold `history` onto a copy of `snapshot` in the order given.
pub fn merge_edits<'e>(
    snapshot: &Record,
    history: impl IntoIterator<Item = &'e ApprovedEdit>,
) -> (Record, MergeReport) {
    let mut merged = snapshot.clone();
    let mut report = MergeReport::new();

    for edit in history {
        report.edits_applied += 1;

        for (field, value) in edit.edits() {
            if value.is_null() {
                report.nulls_skipped += 1;
                continue;
            }

            let previous = merged.insert(field.clone(), value.clone());
            if previous.as_ref() != Some(value) {
                report.add_change(FieldChange {
                    field: field.clone(),
                    previous,
                    value: value.clone(),
                    suggestion_id: edit.suggestion_id().to_string(),
                    applied_at: edit.applied_at,
                });
            }
        }
    }

    (merged, report)
}
