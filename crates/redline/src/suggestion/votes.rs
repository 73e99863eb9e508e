//! Voter tracking for suggestions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Upvote,
    Downvote,
}

/// Up and down voters on a suggestion.
///
/// A voter is in at most one of the two sets. Counts are always the set
/// sizes; nothing is tallied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VoterSets", into = "VoterSets")]
pub struct Votes {
    upvoters: BTreeSet<String>,
    downvoters: BTreeSet<String>,
}

/// Persisted shape of [`Votes`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VoterSets {
    #[serde(default)]
    upvoter_ids: BTreeSet<String>,
    #[serde(default)]
    downvoter_ids: BTreeSet<String>,
}

impl From<VoterSets> for Votes {
    fn from(sets: VoterSets) -> Self {
        let VoterSets {
            mut upvoter_ids,
            downvoter_ids,
        } = sets;
        // Stored data that lists a voter twice keeps only the downvote.
        upvoter_ids.retain(|id| !downvoter_ids.contains(id));
        Self {
            upvoters: upvoter_ids,
            downvoters: downvoter_ids,
        }
    }
}

impl From<Votes> for VoterSets {
    fn from(votes: Votes) -> Self {
        Self {
            upvoter_ids: votes.upvoters,
            downvoter_ids: votes.downvoters,
        }
    }
}

impl Votes {
    /// Create an empty vote record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote, replacing any earlier vote by the same voter.
    pub fn cast(&mut self, voter_id: impl Into<String>, direction: VoteDirection) {
        let voter_id = voter_id.into();
        self.retract(&voter_id);
        match direction {
            VoteDirection::Upvote => self.upvoters.insert(voter_id),
            VoteDirection::Downvote => self.downvoters.insert(voter_id),
        };
    }

    /// Remove a voter's vote, returning the direction it had.
    pub fn retract(&mut self, voter_id: &str) -> Option<VoteDirection> {
        if self.upvoters.remove(voter_id) {
            Some(VoteDirection::Upvote)
        } else if self.downvoters.remove(voter_id) {
            Some(VoteDirection::Downvote)
        } else {
            None
        }
    }

    /// How the given voter voted, if at all.
    pub fn vote_of(&self, voter_id: &str) -> Option<VoteDirection> {
        if self.upvoters.contains(voter_id) {
            Some(VoteDirection::Upvote)
        } else if self.downvoters.contains(voter_id) {
            Some(VoteDirection::Downvote)
        } else {
            None
        }
    }

    pub fn upvotes(&self) -> usize {
        self.upvoters.len()
    }

    pub fn downvotes(&self) -> usize {
        self.downvoters.len()
    }

    /// Upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes() as i64 - self.downvotes() as i64
    }

    pub fn upvoters(&self) -> impl Iterator<Item = &str> {
        self.upvoters.iter().map(String::as_str)
    }

    pub fn downvoters(&self) -> impl Iterator<Item = &str> {
        self.downvoters.iter().map(String::as_str)
    }

    /// Check that no voter appears in both sets.
    pub fn is_consistent(&self) -> bool {
        self.upvoters.is_disjoint(&self.downvoters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_replaces_previous_vote() {
        let mut votes = Votes::new();
        votes.cast("u1", VoteDirection::Upvote);
        assert_eq!(votes.upvotes(), 1);

        votes.cast("u1", VoteDirection::Downvote);
        assert_eq!(votes.upvotes(), 0);
        assert_eq!(votes.downvotes(), 1);
        assert_eq!(votes.vote_of("u1"), Some(VoteDirection::Downvote));
    }

    #[test]
    fn test_repeat_vote_is_idempotent() {
        let mut votes = Votes::new();
        votes.cast("u1", VoteDirection::Upvote);
        votes.cast("u1", VoteDirection::Upvote);

        assert_eq!(votes.upvotes(), 1);
        assert_eq!(votes.score(), 1);
    }

    #[test]
    fn test_retract() {
        let mut votes = Votes::new();
        votes.cast("u1", VoteDirection::Downvote);

        assert_eq!(votes.retract("u1"), Some(VoteDirection::Downvote));
        assert_eq!(votes.retract("u1"), None);
        assert_eq!(votes.downvotes(), 0);
    }

    #[test]
    fn test_overlapping_stored_sets_are_normalized() {
        let json = r#"{"upvoter_ids":["u1","u2"],"downvoter_ids":["u1"]}"#;
        let votes: Votes = serde_json::from_str(json).unwrap();

        assert!(votes.is_consistent());
        assert_eq!(votes.upvotes(), 1);
        assert_eq!(votes.vote_of("u1"), Some(VoteDirection::Downvote));
    }

    #[test]
    fn test_serialized_shape() {
        let mut votes = Votes::new();
        votes.cast("u1", VoteDirection::Upvote);
        let value = serde_json::to_value(&votes).unwrap();

        assert_eq!(value["upvoter_ids"], serde_json::json!(["u1"]));
        assert_eq!(value["downvoter_ids"], serde_json::json!([]));
    }
}
