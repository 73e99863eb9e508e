//! Error types for the redline library.

use std::path::PathBuf;
use thiserror::Error;

use crate::suggestion::SuggestionStatus;

/// Main error type for redline operations.
#[derive(Debug, Error)]
pub enum RedlineError {
    /// No suggestion with the given id exists.
    #[error("Suggestion '{id}' not found")]
    NotFound { id: String },

    /// The suggestion has already been decided.
    #[error("Suggestion '{id}' is not pending (status: {status})")]
    NotPending { id: String, status: SuggestionStatus },

    /// The backing store failed to read or write.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error reading or writing a file-backed store entry.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RedlineError {
    /// Whether this error came from the storage layer.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            RedlineError::Persistence(_) | RedlineError::Io { .. } | RedlineError::Json(_)
        )
    }
}

/// Result type alias for redline operations.
pub type Result<T> = std::result::Result<T, RedlineError>;
