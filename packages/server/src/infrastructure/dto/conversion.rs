//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, PlaybackSnapshot, RoomEvent};
use crate::infrastructure::dto::{
    http::{ChatMessageDto, ChatMessageType, StateResponse},
    websocket::PushMessage,
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<PlaybackSnapshot> for StateResponse {
    fn from(snapshot: PlaybackSnapshot) -> Self {
        Self {
            movie_id: snapshot.movie_id.map(|m| m.into_string()),
            is_playing: snapshot.is_playing,
            server_time: snapshot.server_time,
            owner_id: snapshot.owner_id.map(|o| o.into_string()),
        }
    }
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            r#type: ChatMessageType::Chat,
            user: model.user.into_string(),
            text: model.text.into_string(),
            ts: model.ts.value(),
        }
    }
}

impl From<&RoomEvent> for PushMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::State {
                movie_id,
                is_playing,
                server_time,
            } => PushMessage::State {
                movie_id: movie_id.as_ref().map(|m| m.as_str().to_string()),
                is_playing: *is_playing,
                server_time: *server_time,
            },
            RoomEvent::Play { time, movie_id } => PushMessage::Play {
                time: *time,
                movie_id: movie_id.as_ref().map(|m| m.as_str().to_string()),
            },
            RoomEvent::Pause { time } => PushMessage::Pause { time: *time },
            RoomEvent::Seek { time } => PushMessage::Seek { time: *time },
            RoomEvent::Chat(message) => PushMessage::Chat {
                user: message.user.as_str().to_string(),
                text: message.text.as_str().to_string(),
                ts: message.ts.value(),
            },
        }
    }
}
