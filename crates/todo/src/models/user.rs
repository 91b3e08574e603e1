//! Account and API token types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tutorial_core::{UserId, Username};

/// An API account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub created_at: DateTime<Utc>,
}

/// Bearer credential sent as `Authorization: Token <key>`.
///
/// 40 lowercase hex characters (20 random bytes). Each user holds at most one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Length of a token key in characters.
    pub const LENGTH: usize = 40;

    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; Self::LENGTH / 2] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Accept a key only if it has the shape of a token.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let well_formed = key.len() == Self::LENGTH
            && key
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(key.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep keys out of logs
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_well_formed_and_distinct() {
        let a = AuthToken::generate();
        let b = AuthToken::generate();

        assert_eq!(a.as_str().len(), AuthToken::LENGTH);
        assert_eq!(AuthToken::parse(a.as_str()), Some(a.clone()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(AuthToken::parse("").is_none());
        assert!(AuthToken::parse(&"a".repeat(39)).is_none());
        assert!(AuthToken::parse(&"A".repeat(40)).is_none());
        assert!(AuthToken::parse(&"g".repeat(40)).is_none());
        assert!(AuthToken::parse(&"0".repeat(40)).is_some());
    }

    #[test]
    fn test_debug_redacts_key() {
        let token = AuthToken::generate();
        assert!(!format!("{token:?}").contains(token.as_str()));
    }
}
