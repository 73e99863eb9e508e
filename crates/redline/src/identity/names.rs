//! Display-name resolution for suggestion authors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{RedlineError, Result};
use crate::store::KeyValueStore;

/// Key prefix under which generated display names are stored.
pub const DISPLAY_NAME_KEY_PREFIX: &str = "displayName_";

const ADJECTIVES: &[&str] = &[
    "Amazing", "Brilliant", "Clever", "Dazzling", "Epic", "Fantastic", "Great", "Happy",
    "Incredible", "Jolly", "Kind", "Lucky", "Magnificent", "Nice", "Outstanding", "Perfect",
    "Quick", "Radiant", "Super", "Terrific", "Unique", "Vibrant", "Wonderful", "Excellent",
    "Zealous", "Bold", "Calm", "Dynamic", "Elegant", "Fresh", "Golden", "Humble",
    "Inspired", "Joyful", "Keen", "Lively", "Modern", "Noble", "Optimistic", "Peaceful",
    "Quiet", "Refined", "Smart", "Thoughtful", "Upbeat", "Vivid", "Wise", "Young",
];

const NOUNS: &[&str] = &[
    "Reviewer", "Foodie", "Critic", "Explorer", "Hunter", "Seeker", "Taster", "Guide",
    "Expert", "Connoisseur", "Enthusiast", "Lover", "Fan", "Devotee", "Admirer", "Patron",
    "Diner", "Gourmet", "Chef", "Cook", "Baker", "Eater", "Sampler", "Judge",
    "Scholar", "Student", "Teacher", "Master", "Apprentice", "Artist", "Creator", "Maker",
    "Writer", "Blogger", "Journalist", "Reporter", "Observer", "Witness", "Visitor", "Guest",
    "Traveler", "Wanderer", "Navigator", "Pioneer", "Discoverer", "Adventurer", "Scout", "Ranger",
];

/// Maps a user identifier to a human-readable name.
///
/// Called once per submission; the result is frozen into the suggestion.
pub trait DisplayNameResolver: Send + Sync {
    /// Resolve a display name. Never fails; implementations fall back to
    /// something presentable.
    fn resolve(&self, user_id: &str) -> String;
}

impl<R: DisplayNameResolver + ?Sized> DisplayNameResolver for Arc<R> {
    fn resolve(&self, user_id: &str) -> String {
        (**self).resolve(user_id)
    }
}

/// Resolver backed by a fixed map, falling back to the user id itself.
#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    names: HashMap<String, String>,
}

impl StaticNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name for a user.
    pub fn with_name(mut self, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(user_id.into(), name.into());
        self
    }
}

impl DisplayNameResolver for StaticNameResolver {
    fn resolve(&self, user_id: &str) -> String {
        self.names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    }
}

/// Resolver that hands out a random `AdjectiveNoun123` name the first time
/// a user is seen and remembers it in the key-value store.
pub struct GeneratedNameResolver<S> {
    store: S,
    rng: Mutex<fastrand::Rng>,
}

impl<S: KeyValueStore> GeneratedNameResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Use a seeded generator (deterministic names).
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Override a user's display name.
    pub fn set_display_name(&self, user_id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RedlineError::Validation(
                "Display name must not be empty".to_string(),
            ));
        }
        self.store.set(&display_name_key(user_id), name)
    }

    /// Stored display name for a user, if one has been assigned.
    pub fn stored_name(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .get(&display_name_key(user_id))?
            .filter(|name| !name.trim().is_empty()))
    }

    fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        generate_name(&mut rng)
    }
}

impl<S: KeyValueStore> DisplayNameResolver for GeneratedNameResolver<S> {
    fn resolve(&self, user_id: &str) -> String {
        match self.stored_name(user_id) {
            Ok(Some(name)) => return name,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to read display name");
            }
        }

        let name = self.generate();
        if let Err(e) = self.store.set(&display_name_key(user_id), &name) {
            tracing::warn!(user_id, error = %e, "Failed to remember display name");
        }
        name
    }
}

/// Generate a random `AdjectiveNoun123`-style name.
pub fn generate_name(rng: &mut fastrand::Rng) -> String {
    let adjective = ADJECTIVES[rng.usize(..ADJECTIVES.len())];
    let noun = NOUNS[rng.usize(..NOUNS.len())];
    let number = rng.u32(0..1000);
    format!("{}{}{}", adjective, noun, number)
}

fn display_name_key(user_id: &str) -> String {
    format!("{}{}", DISPLAY_NAME_KEY_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_static_resolver_falls_back_to_id() {
        let resolver = StaticNameResolver::new().with_name("u1", "Alice");

        assert_eq!(resolver.resolve("u1"), "Alice");
        assert_eq!(resolver.resolve("u2"), "u2");
    }

    #[test]
    fn test_generated_name_is_stable() {
        let store = Arc::new(MemoryStore::new());
        let resolver = GeneratedNameResolver::with_seed(Arc::clone(&store), 7);

        let first = resolver.resolve("alice@example.com");
        let second = resolver.resolve("alice@example.com");

        assert_eq!(first, second);
        assert_eq!(
            store.get("displayName_alice@example.com").unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_generated_name_shape() {
        let mut rng = fastrand::Rng::with_seed(42);
        let name = generate_name(&mut rng);

        assert!(ADJECTIVES.iter().any(|a| name.starts_with(a)));
        assert!(name.chars().last().unwrap().is_ascii_digit());
    }

    #[test]
    fn test_override_display_name() {
        let resolver = GeneratedNameResolver::new(MemoryStore::new());
        resolver.set_display_name("u1", "Pat").unwrap();

        assert_eq!(resolver.resolve("u1"), "Pat");
        assert!(resolver.set_display_name("u1", "  ").is_err());
    }
}
