//! Owner authorization for control requests.
//!
//! The room engine never checks who is calling. The gateway asks an
//! `OwnerAuthorizer` before forwarding `init`, `play`, `pause`, `seek` or
//! `delete`, and rejects the request with `403` when it says no.

use async_trait::async_trait;

use crate::usecase::{RoomActor, RoomError};

/// Request header carrying the caller's user id
pub const REQUESTER_HEADER: &str = "x-user-id";

/// Decides whether `requester` may control `room`
#[async_trait]
pub trait OwnerAuthorizer: Send + Sync {
    async fn is_owner(&self, requester: Option<&str>, room: &RoomActor) -> Result<bool, RoomError>;
}

/// Trusts every caller
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllAuthorizer;

#[async_trait]
impl OwnerAuthorizer for AllowAllAuthorizer {
    async fn is_owner(
        &self,
        _requester: Option<&str>,
        _room: &RoomActor,
    ) -> Result<bool, RoomError> {
        Ok(true)
    }
}

/// Compares the requester header against the room's `ownerId`.
///
/// A room without an owner accepts any caller, so the first `init` can
/// claim it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerHeaderAuthorizer;

#[async_trait]
impl OwnerAuthorizer for OwnerHeaderAuthorizer {
    async fn is_owner(&self, requester: Option<&str>, room: &RoomActor) -> Result<bool, RoomError> {
        let state = room.get_state().await?;
        Ok(match state.owner_id {
            None => true,
            Some(owner) => requester == Some(owner.as_str()),
        })
    }
}
