//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueObjectError {
    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// RoomId contains characters that are not URL-path safe
    #[error("RoomId may only contain ASCII letters, digits, '-' and '_' (got: {0})")]
    RoomIdInvalidFormat(String),

    /// MovieId validation error
    #[error("MovieId cannot be empty")]
    MovieIdEmpty,

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// Playback position was not supplied
    #[error("Playback position is required")]
    PositionMissing,

    /// Playback position is NaN or infinite
    #[error("Playback position must be a finite number (got {0})")]
    PositionNotFinite(f64),

    /// Playback position is before the start of the content
    #[error("Playback position cannot be negative (got {0})")]
    PositionNegative(f64),

    /// Chat text is empty after trimming
    #[error("Chat message cannot be empty")]
    ChatTextEmpty,
}

/// Storage errors surfaced by a `RoomRepository`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not complete the read or write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while pushing to a single connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The connection is not registered (already removed or never added)
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// The transport rejected the message (socket closed)
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
