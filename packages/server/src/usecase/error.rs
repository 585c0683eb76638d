//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Errors returned by `RoomActor` commands
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoomError {
    /// Input rejected before any mutation or broadcast
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    /// Storage read/write failed; the command had no effect
    #[error(transparent)]
    Storage(#[from] RepositoryError),

    /// The actor was torn down by `delete` while this command was queued.
    /// Retrying through the directory reaches the fresh room.
    #[error("Room was deleted while the command was pending")]
    RoomDeleted,
}
