//! HTTP API request / response DTOs.
//!
//! Field names are camelCase on the wire. Request fields are optional so that
//! malformed or partial bodies fall back to defaults instead of failing to
//! deserialize.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/rooms/{room_id}/init`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitRequest {
    pub movie_id: Option<String>,
    pub owner_id: Option<String>,
}

/// Body of `POST /api/rooms/{room_id}/play`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayRequest {
    pub position: Option<f64>,
    pub movie_id: Option<String>,
}

/// Body of `POST /api/rooms/{room_id}/seek`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeekRequest {
    pub position: Option<f64>,
}

/// Body of `POST /api/rooms/{room_id}/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostChatRequest {
    pub user: Option<String>,
    pub text: Option<String>,
}

/// `{"ok": true}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Response of `GET /api/rooms/{room_id}/state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub movie_id: Option<String>,
    pub is_playing: bool,
    pub server_time: f64,
    pub owner_id: Option<String>,
}

/// Chat message kind tag (always "CHAT")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatMessageType {
    Chat,
}

/// Chat message as returned by the chat endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub r#type: ChatMessageType,
    pub user: String,
    pub text: String,
    /// Unix timestamp (milliseconds since epoch)
    pub ts: i64,
}

/// Response of `POST /api/rooms/{room_id}/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostChatResponse {
    pub ok: bool,
    pub message: ChatMessageDto,
}

/// Response of `GET /api/rooms/{room_id}/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatListResponse {
    pub messages: Vec<ChatMessageDto>,
}

/// Error body, e.g. `{"error":"Chat message cannot be empty","code":"EmptyMessage"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
