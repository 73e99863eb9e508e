//! Suggestion service: submission, voting, and review.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::apply::{EditApplier, MergeReport, Record};
use crate::error::{RedlineError, Result};
use crate::identity::{
    new_suggestion_id, non_blank, require_id, Clock, DisplayNameResolver, SystemClock,
};
use crate::store::{KeyValueStore, RecordStore, APPROVED_EDITS_KEY, SUGGESTIONS_KEY};

use super::suggestion::{
    ApprovedEdit, EditSuggestion, FieldEdits, Review, StatusFilter, SuggestionStatus,
};
use super::votes::{VoteDirection, Votes};

/// Configuration for the suggestion service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Store key of the suggestions collection.
    pub suggestions_key: String,
    /// Store key of the approved-edits collection.
    pub approved_edits_key: String,
    /// Accept votes on suggestions that were already approved or rejected.
    pub allow_votes_on_decided: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            suggestions_key: SUGGESTIONS_KEY.to_string(),
            approved_edits_key: APPROVED_EDITS_KEY.to_string(),
            allow_votes_on_decided: false,
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom collection keys.
    pub fn with_keys(
        mut self,
        suggestions_key: impl Into<String>,
        approved_edits_key: impl Into<String>,
    ) -> Self {
        self.suggestions_key = suggestions_key.into();
        self.approved_edits_key = approved_edits_key.into();
        self
    }

    /// Allow or refuse votes on decided suggestions.
    pub fn with_votes_on_decided(mut self, allow: bool) -> Self {
        self.allow_votes_on_decided = allow;
        self
    }
}

/// Counts of suggestions by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl SuggestionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of suggestions.
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }

    /// Number of decided suggestions (not pending).
    pub fn decided(&self) -> usize {
        self.approved + self.rejected
    }

    fn record(&mut self, status: SuggestionStatus) {
        match status {
            SuggestionStatus::Pending => self.pending += 1,
            SuggestionStatus::Approved => self.approved += 1,
            SuggestionStatus::Rejected => self.rejected += 1,
        }
    }
}

/// Owns the suggestion lifecycle: `pending → approved | rejected`.
///
/// Every mutation loads the whole suggestions collection, changes one entry,
/// and writes the collection back. If the final write fails, the durable
/// state is left as it was and the error is returned.
///
/// # Example
///
/// ```
/// use redline::{FieldEdits, MemoryStore, StaticNameResolver, SuggestionService, VoteDirection};
/// use serde_json::json;
///
/// let service = SuggestionService::new(MemoryStore::new(), StaticNameResolver::new());
///
/// let mut edits = FieldEdits::new();
/// edits.insert("name".to_string(), json!("New Name"));
/// let suggestion = service.submit("r1", "alice", edits, Some("typo")).unwrap();
///
/// service.vote(&suggestion.id, "bob", VoteDirection::Upvote).unwrap();
/// service.approve(&suggestion.id, "reviewer").unwrap();
///
/// let merged = service.apply(&json!({"name": "Old"}).as_object().unwrap().clone(), "r1");
/// assert_eq!(merged["name"], "New Name");
/// ```
pub struct SuggestionService<S> {
    config: ServiceConfig,
    records: RecordStore<S>,
    resolver: Arc<dyn DisplayNameResolver>,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> SuggestionService<S> {
    /// Create a service with default configuration.
    pub fn new(store: S, resolver: impl DisplayNameResolver + 'static) -> Self {
        Self::with_config(store, resolver, ServiceConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(
        store: S,
        resolver: impl DisplayNameResolver + 'static,
        config: ServiceConfig,
    ) -> Self {
        let records = RecordStore::with_keys(
            store,
            config.suggestions_key.clone(),
            config.approved_edits_key.clone(),
        );

        Self {
            config,
            records,
            resolver: Arc::new(resolver),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The typed collection adapter.
    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    /// Submit a new suggestion for a record.
    pub fn submit(
        &self,
        record_id: &str,
        author_id: &str,
        edits: FieldEdits,
        reason: Option<&str>,
    ) -> Result<EditSuggestion> {
        let record_id = require_id("record id", record_id)?;
        let author_id = require_id("author id", author_id)?;

        let suggestion = EditSuggestion {
            id: new_suggestion_id(),
            record_id: record_id.to_string(),
            author_id: author_id.to_string(),
            author_display_name: self.resolver.resolve(author_id),
            edits,
            reason: non_blank(reason),
            review: Review::Pending,
            created_at: self.clock.now(),
            votes: Votes::new(),
        };

        let _guard = self.records.lock();
        let mut suggestions = self.records.try_load_suggestions()?;
        suggestions.push(suggestion.clone());
        self.records.save_suggestions(&suggestions)?;

        tracing::debug!(
            suggestion_id = %suggestion.id,
            record_id,
            fields = suggestion.edits.len(),
            "Suggestion submitted"
        );
        Ok(suggestion)
    }

    /// Look up a suggestion by id.
    pub fn get(&self, suggestion_id: &str) -> Option<EditSuggestion> {
        self.records
            .load_suggestions()
            .into_iter()
            .find(|s| s.id == suggestion_id)
    }

    /// Suggestions for a record, newest first.
    ///
    /// Read failures yield an empty list.
    pub fn list(&self, record_id: &str, filter: impl Into<StatusFilter>) -> Vec<EditSuggestion> {
        let filter = filter.into();
        let mut matching: Vec<_> = self
            .records
            .load_suggestions()
            .into_iter()
            .filter(|s| s.record_id == record_id && filter.matches(s.status()))
            .collect();
        newest_first(&mut matching);
        matching
    }

    /// Suggestions across all records matching `filter`, newest first.
    pub fn list_all(&self, filter: impl Into<StatusFilter>) -> Vec<EditSuggestion> {
        let filter = filter.into();
        let mut matching: Vec<_> = self
            .records
            .load_suggestions()
            .into_iter()
            .filter(|s| filter.matches(s.status()))
            .collect();
        newest_first(&mut matching);
        matching
    }

    /// Pending suggestions across all records, newest first.
    pub fn pending_for_moderation(&self) -> Vec<EditSuggestion> {
        self.list_all(SuggestionStatus::Pending)
    }

    /// Suggestion counts by status for a record.
    pub fn counts(&self, record_id: &str) -> SuggestionCounts {
        let mut counts = SuggestionCounts::new();
        for suggestion in self.records.load_suggestions() {
            if suggestion.record_id == record_id {
                counts.record(suggestion.status());
            }
        }
        counts
    }

    /// Vote on a suggestion, replacing the voter's earlier vote if any.
    pub fn vote(
        &self,
        suggestion_id: &str,
        voter_id: &str,
        direction: VoteDirection,
    ) -> Result<EditSuggestion> {
        let voter_id = require_id("voter id", voter_id)?;
        let allow_decided = self.config.allow_votes_on_decided;

        let updated = self.update(suggestion_id, |suggestion| {
            if !allow_decided {
                ensure_pending(suggestion)?;
            }
            suggestion.votes.cast(voter_id, direction);
            Ok(())
        })?;

        tracing::debug!(
            suggestion_id,
            voter_id,
            ?direction,
            upvotes = updated.votes.upvotes(),
            downvotes = updated.votes.downvotes(),
            "Vote recorded"
        );
        Ok(updated)
    }

    /// Withdraw a voter's vote. Succeeds even if the voter had not voted.
    pub fn retract_vote(&self, suggestion_id: &str, voter_id: &str) -> Result<EditSuggestion> {
        let voter_id = require_id("voter id", voter_id)?;
        let allow_decided = self.config.allow_votes_on_decided;

        self.update(suggestion_id, |suggestion| {
            if !allow_decided {
                ensure_pending(suggestion)?;
            }
            suggestion.votes.retract(voter_id);
            Ok(())
        })
    }

    /// Approve a pending suggestion and record it as an approved edit.
    ///
    /// The suggestion is written before the approved edit. If the second
    /// write fails the suggestion is restored to pending, retrying the
    /// restore once. Should both restore attempts fail as well, the stored
    /// suggestion stays approved without an approved edit until the next
    /// successful write; the error is logged and `Persistence` is returned.
    pub fn approve(&self, suggestion_id: &str, reviewer_id: &str) -> Result<EditSuggestion> {
        let reviewer_id = require_id("reviewer id", reviewer_id)?;
        let review = Review::Approved {
            decided_by: reviewer_id.to_string(),
            decided_at: self.clock.now(),
        };
        self.decide(suggestion_id, review)
    }

    /// Reject a pending suggestion.
    pub fn reject(
        &self,
        suggestion_id: &str,
        reviewer_id: &str,
        reason: Option<&str>,
    ) -> Result<EditSuggestion> {
        let reviewer_id = require_id("reviewer id", reviewer_id)?;
        let review = Review::Rejected {
            decided_by: reviewer_id.to_string(),
            decided_at: self.clock.now(),
            rejection_reason: non_blank(reason),
        };
        self.decide(suggestion_id, review)
    }

    /// Approved edits for a record, oldest approval first.
    pub fn approved_edits(&self, record_id: &str) -> Vec<ApprovedEdit> {
        EditApplier::new(&self.records).history(record_id)
    }

    /// Merge a record's approved edits onto a snapshot.
    pub fn apply(&self, snapshot: &Record, record_id: &str) -> Record {
        EditApplier::new(&self.records).apply(snapshot, record_id)
    }

    /// Merge a record's approved edits and report what changed.
    pub fn apply_with_report(&self, snapshot: &Record, record_id: &str) -> (Record, MergeReport) {
        EditApplier::new(&self.records).apply_with_report(snapshot, record_id)
    }

    /// Remove every suggestion and approved edit. Reset tooling only.
    pub fn clear_all(&self) -> Result<()> {
        self.records.clear()
    }

    // Helper methods

    fn update<F>(&self, suggestion_id: &str, mutate: F) -> Result<EditSuggestion>
    where
        F: FnOnce(&mut EditSuggestion) -> Result<()>,
    {
        let _guard = self.records.lock();
        let mut suggestions = self.records.try_load_suggestions()?;
        let index = position(&suggestions, suggestion_id)?;

        mutate(&mut suggestions[index])?;
        let updated = suggestions[index].clone();

        self.records.save_suggestions(&suggestions)?;
        Ok(updated)
    }

    fn decide(&self, suggestion_id: &str, review: Review) -> Result<EditSuggestion> {
        let _guard = self.records.lock();
        let mut suggestions = self.records.try_load_suggestions()?;
        let index = position(&suggestions, suggestion_id)?;
        ensure_pending(&suggestions[index])?;

        suggestions[index].review = review;
        let decided = suggestions[index].clone();

        match &decided.review {
            Review::Approved { decided_at, .. } => {
                let mut approved = self.records.try_load_approved_edits()?;
                approved.push(ApprovedEdit::new(decided.clone(), *decided_at));

                self.records.save_suggestions(&suggestions)?;
                if let Err(e) = self.records.save_approved_edits(&approved) {
                    suggestions[index].review = Review::Pending;
                    self.restore_pending(suggestion_id, &suggestions);
                    return Err(e);
                }
            }
            _ => self.records.save_suggestions(&suggestions)?,
        }

        tracing::debug!(
            suggestion_id,
            status = %decided.status(),
            decided_by = decided.review.decided_by(),
            "Suggestion decided"
        );
        Ok(decided)
    }

    fn restore_pending(&self, suggestion_id: &str, suggestions: &[EditSuggestion]) {
        const ATTEMPTS: usize = 2;

        for attempt in 1..=ATTEMPTS {
            match self.records.save_suggestions(suggestions) {
                Ok(()) => return,
                Err(e) if attempt < ATTEMPTS => {
                    tracing::warn!(
                        suggestion_id,
                        attempt,
                        error = %e,
                        "Retrying suggestion restore"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        suggestion_id,
                        error = %e,
                        "Failed to restore suggestion after approval write failed"
                    );
                }
            }
        }
    }
}

fn position(suggestions: &[EditSuggestion], suggestion_id: &str) -> Result<usize> {
    suggestions
        .iter()
        .position(|s| s.id == suggestion_id)
        .ok_or_else(|| RedlineError::NotFound {
            id: suggestion_id.to_string(),
        })
}

fn ensure_pending(suggestion: &EditSuggestion) -> Result<()> {
    if suggestion.is_pending() {
        Ok(())
    } else {
        Err(RedlineError::NotPending {
            id: suggestion.id.clone(),
            status: suggestion.status(),
        })
    }
}

fn newest_first(suggestions: &mut [EditSuggestion]) {
    suggestions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
