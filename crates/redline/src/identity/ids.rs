//! Identifier generation and input checks.

use uuid::Uuid;

use crate::error::{RedlineError, Result};

/// Prefix carried by every suggestion id.
pub const SUGGESTION_ID_PREFIX: &str = "sug_";

/// Generate a fresh suggestion id.
///
/// Ids are time-ordered (UUIDv7) so they stay unique across process
/// restarts against the same store.
pub fn new_suggestion_id() -> String {
    format!("{}{}", SUGGESTION_ID_PREFIX, Uuid::now_v7().simple())
}

/// Require a non-blank identifier.
///
/// The id is returned as given. Ids are opaque, so surrounding whitespace
/// is part of the id and every lookup must use it verbatim.
pub fn require_id<'a>(kind: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(RedlineError::Validation(format!("{} must not be empty", kind)));
    }
    Ok(value)
}

/// Normalize optional free text: blank becomes `None`.
pub fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_ids_are_unique() {
        let a = new_suggestion_id();
        let b = new_suggestion_id();

        assert!(a.starts_with(SUGGESTION_ID_PREFIX));
        assert_ne!(a, b);
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("record id", "  r1 ").unwrap(), "  r1 ");
        assert!(matches!(
            require_id("record id", "   "),
            Err(RedlineError::Validation(_))
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  typo fix ")), Some("typo fix".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
