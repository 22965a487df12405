//! The explicit user context that every query is built from.
//!
//! The identity itself is issued by the external authentication service. This
//! crate only carries it around, it never validates credentials.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A newtype wrapper for the opaque user IDs issued by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    ///
    /// Returns `None` if `id` is empty or only whitespace.
    pub fn new(id: &str) -> Option<Self> {
        let id = id.trim();

        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_owned()))
        }
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The signed-in user that queries run on behalf of.
///
/// Pass a `Session` (or `None` when nobody is signed in) into every ledger
/// call instead of looking the current user up from global state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
}

impl Session {
    /// Create a session for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// The ID of the signed-in user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::UserId;

    #[test]
    fn user_id_trims_whitespace() {
        let user_id = UserId::new("  abc123 ").unwrap();

        assert_eq!(user_id.as_str(), "abc123");
    }

    #[test]
    fn user_id_rejects_blank_strings() {
        assert_eq!(UserId::new(""), None);
        assert_eq!(UserId::new("   "), None);
    }
}
