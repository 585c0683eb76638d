//! Domain layer for the watch party room engine.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod clock;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use clock::project_server_time;
pub use entity::{
    ANONYMOUS_USER, ChatLog, ChatMessage, DEFAULT_CHAT_CAPACITY, PlaybackSnapshot, RoomEvent,
    RoomState,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{ConnectionId, MessagePusher, PushFrame, PusherChannel};
pub use repository::RoomRepository;
#[cfg(test)]
pub use repository::MockRoomRepository;
pub use value_object::{
    CHAT_TEXT_MAX_CHARS, ChatText, MovieId, PlaybackPosition, RoomId, Timestamp, UserId, Username,
};
