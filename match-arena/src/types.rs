/// Core identity types for the match-arena library
use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::name_generator;

/// Unique player identifier
///
/// UserId is an opaque token supplied by the hosting runtime's
/// presence layer. It must be:
/// - Non-empty UTF-8
/// - Free of whitespace and control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a new unique user ID (guaranteed to be token-safe)
    /// Uses base58 encoding of UUID to avoid special characters
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let encoded = bs58::encode(uuid.as_bytes()).into_string();
        // Take first 16 characters for reasonable length
        let shortened = encoded.chars().take(16).collect::<String>();
        UserId(shortened)
    }

    /// Create from a specific identifier string
    /// Returns error if the string contains invalid characters
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(UserId(id))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string can be used as a UserId
    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(ArenaError::InvalidUserId(
                "User id cannot be empty".to_string(),
            ));
        }

        for ch in s.chars() {
            if ch.is_whitespace() || ch.is_control() {
                return Err(ArenaError::InvalidUserId(format!(
                    "User id '{}' contains invalid character '{}'",
                    s,
                    ch.escape_default()
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique match instance identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Generate a new unique match ID
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let encoded = bs58::encode(uuid.as_bytes()).into_string();
        let shortened = encoded.chars().take(16).collect::<String>();
        MatchId(shortened)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player's presence in a match, as reported by the hosting runtime
///
/// The `user_id` is authoritative identity; `username` is a display label
/// recorded at join time and used only for presentation payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Authoritative player identity
    pub user_id: UserId,
    /// Human-readable display label
    pub username: String,
    /// Connection session identifier
    pub session_id: String,
}

impl Presence {
    /// Create a presence with an explicit identity and display name
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Create a throwaway guest presence with a generated identity and a
    /// readable random username
    pub fn guest() -> Self {
        Self::new(UserId::generate(), name_generator::generate_unique_name())
    }
}
