use serde::{Deserialize, Serialize};

/// Creator profile record: a registered creator identity.
///
/// Identity: sequential `u64` id with its own counter.
///
/// Invariants:
/// - `owner` is the registering principal, immutable
/// - Only the owner may update `name` and `bio`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatorProfile {
    /// Principal that registered the profile
    pub owner: String,

    /// Display name
    pub name: String,

    /// Free-form biography text
    pub bio: String,
}

impl CreatorProfile {
    pub fn new(owner: String, name: String, bio: String) -> Self {
        CreatorProfile { owner, name, bio }
    }

    /// Replace the mutable profile fields
    pub fn update(&mut self, name: String, bio: String) {
        self.name = name;
        self.bio = bio;
    }

    pub fn is_owned_by(&self, principal: &str) -> bool {
        self.owner == principal
    }
}
