/// Error types for the match-arena library
use thiserror::Error;

/// Result type alias for arena operations
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Errors that can occur in match-arena operations
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Invalid user identifier provided
    #[error("Invalid user id: {0}. Must be non-empty with no whitespace or control characters")]
    InvalidUserId(String),

    /// Match not found in the registry
    #[error("Match not found: {0}")]
    MatchNotFound(String),

    /// Join attempt rejected by the match handler
    #[error("Join rejected: {0}")]
    JoinRejected(String),

    /// Command channel to a match closed (the match has shut down)
    #[error("Match channel closed: {0}")]
    ChannelClosed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
