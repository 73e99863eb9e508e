//! Suggestion types for proposed record edits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RedlineError;

use super::votes::Votes;

/// Proposed field values, keyed by field name in submission order.
///
/// A `null` value means "leave this field alone" when the edit is applied.
pub type FieldEdits = IndexMap<String, Value>;

/// Lifecycle status of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Awaiting review.
    Pending,
    /// Approved by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

impl SuggestionStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "Pending",
            SuggestionStatus::Approved => "Approved",
            SuggestionStatus::Rejected => "Rejected",
        }
    }

    /// Check if this is a terminal status.
    pub fn is_decided(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Review state of a suggestion, including decision metadata once decided.
///
/// Serialized flat into the owning suggestion with a `status` tag, so a
/// pending suggestion has no `decided_by`/`decided_at` keys at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Review {
    Pending,
    Approved {
        decided_by: String,
        decided_at: DateTime<Utc>,
    },
    Rejected {
        decided_by: String,
        decided_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rejection_reason: Option<String>,
    },
}

impl Review {
    /// The status this review state corresponds to.
    pub fn status(&self) -> SuggestionStatus {
        match self {
            Review::Pending => SuggestionStatus::Pending,
            Review::Approved { .. } => SuggestionStatus::Approved,
            Review::Rejected { .. } => SuggestionStatus::Rejected,
        }
    }

    /// Reviewer who made the decision, if decided.
    pub fn decided_by(&self) -> Option<&str> {
        match self {
            Review::Pending => None,
            Review::Approved { decided_by, .. } | Review::Rejected { decided_by, .. } => {
                Some(decided_by)
            }
        }
    }

    /// When the decision was made, if decided.
    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Review::Pending => None,
            Review::Approved { decided_at, .. } | Review::Rejected { decided_at, .. } => {
                Some(*decided_at)
            }
        }
    }

    /// Rejection reason, if rejected with one.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Review::Rejected {
                rejection_reason, ..
            } => rejection_reason.as_deref(),
            _ => None,
        }
    }
}

/// A proposed set of field changes to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSuggestion {
    /// Unique identifier for this suggestion.
    pub id: String,

    /// Record the edits target.
    pub record_id: String,

    /// Who submitted the suggestion.
    pub author_id: String,

    /// Display name of the author, frozen at submission time.
    pub author_display_name: String,

    /// Proposed field values.
    pub edits: FieldEdits,

    /// Free-text rationale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Review status and decision metadata.
    #[serde(flatten)]
    pub review: Review,

    /// When the suggestion was submitted.
    pub created_at: DateTime<Utc>,

    /// Up and down voters.
    #[serde(default)]
    pub votes: Votes,
}

impl EditSuggestion {
    /// Current status.
    pub fn status(&self) -> SuggestionStatus {
        self.review.status()
    }

    /// Check if the suggestion is still awaiting review.
    pub fn is_pending(&self) -> bool {
        self.status() == SuggestionStatus::Pending
    }

    /// Check if the suggestion touches the given field.
    pub fn touches(&self, field: &str) -> bool {
        self.edits.contains_key(field)
    }
}

/// Frozen copy of a suggestion at the moment it was approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedEdit {
    /// The suggestion as it stood when approved.
    #[serde(flatten)]
    pub suggestion: EditSuggestion,

    /// Approval timestamp; orders edits during merge.
    pub applied_at: DateTime<Utc>,
}

impl ApprovedEdit {
    /// Freeze an approved suggestion.
    pub fn new(suggestion: EditSuggestion, applied_at: DateTime<Utc>) -> Self {
        Self {
            suggestion,
            applied_at,
        }
    }

    /// Id of the suggestion this edit came from.
    pub fn suggestion_id(&self) -> &str {
        &self.suggestion.id
    }

    /// Record the edit targets.
    pub fn record_id(&self) -> &str {
        &self.suggestion.record_id
    }

    /// The approved field values.
    pub fn edits(&self) -> &FieldEdits {
        &self.suggestion.edits
    }
}

/// Status filter for listing suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SuggestionStatus),
}

impl StatusFilter {
    /// Check whether a status passes the filter.
    pub fn matches(&self, status: SuggestionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<SuggestionStatus> for StatusFilter {
    fn from(status: SuggestionStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = RedlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Only(SuggestionStatus::Pending)),
            "approved" => Ok(StatusFilter::Only(SuggestionStatus::Approved)),
            "rejected" => Ok(StatusFilter::Only(SuggestionStatus::Rejected)),
            other => Err(RedlineError::Validation(format!(
                "Unknown status filter '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(review: Review) -> EditSuggestion {
        let mut edits = FieldEdits::new();
        edits.insert("name".to_string(), json!("New Name"));
        EditSuggestion {
            id: "sug_1".to_string(),
            record_id: "r1".to_string(),
            author_id: "alice@example.com".to_string(),
            author_display_name: "Alice".to_string(),
            edits,
            reason: None,
            review,
            created_at: Utc::now(),
            votes: Votes::default(),
        }
    }

    #[test]
    fn test_pending_serializes_without_decision_fields() {
        let value = serde_json::to_value(sample(Review::Pending)).unwrap();

        assert_eq!(value["status"], "pending");
        assert!(value.get("decided_by").is_none());
        assert!(value.get("decided_at").is_none());
        assert!(value.get("reason").is_none());
    }

    #[test]
    fn test_rejected_round_trips_metadata() {
        let review = Review::Rejected {
            decided_by: "v1".to_string(),
            decided_at: Utc::now(),
            rejection_reason: Some("Duplicate".to_string()),
        };
        let json = serde_json::to_string(&sample(review.clone())).unwrap();
        let back: EditSuggestion = serde_json::from_str(&json).unwrap();

        assert_eq!(back.status(), SuggestionStatus::Rejected);
        assert_eq!(back.review, review);
        assert_eq!(back.review.rejection_reason(), Some("Duplicate"));
        assert_eq!(back.review.decided_by(), Some("v1"));
    }

    #[test]
    fn test_approved_edit_flattens_suggestion() {
        let approved = ApprovedEdit::new(
            sample(Review::Approved {
                decided_by: "v1".to_string(),
                decided_at: Utc::now(),
            }),
            Utc::now(),
        );
        let value = serde_json::to_value(&approved).unwrap();

        assert_eq!(value["id"], "sug_1");
        assert_eq!(value["status"], "approved");
        assert!(value.get("applied_at").is_some());
        assert_eq!(approved.record_id(), "r1");
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(SuggestionStatus::Pending)
        );
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_checks() {
        assert!(!SuggestionStatus::Pending.is_decided());
        assert!(SuggestionStatus::Approved.is_decided());
        assert!(SuggestionStatus::Rejected.is_decided());
        assert_eq!(SuggestionStatus::Approved.label(), "Approved");
        assert_eq!(SuggestionStatus::Rejected.to_string(), "rejected");
    }
}
