//! HTTP API endpoint handlers.
//!
//! Each handler parses the room id, resolves the RoomActor through the
//! directory and forwards one command. Control endpoints consult the
//! `OwnerAuthorizer` first.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::de::DeserializeOwned;

use crate::{
    domain::{RoomId, ValueObjectError},
    infrastructure::dto::http::{
        ChatListResponse, ChatMessageDto, InitRequest, OkResponse, PlayRequest, PostChatRequest,
        PostChatResponse, SeekRequest, StateResponse,
    },
    ui::{authorizer::REQUESTER_HEADER, error::ApiError, state::AppState},
    usecase::RoomActor,
};

/// Lenient body parsing: an empty or malformed body yields the defaults
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Ignoring malformed request body: {}", e);
        T::default()
    })
}

fn requester(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUESTER_HEADER)
        .and_then(|value| value.to_str().ok())
}

async fn resolve_room(state: &AppState, room_id: String) -> Result<Arc<RoomActor>, ApiError> {
    let room_id = RoomId::try_from(room_id)?;
    Ok(state.directory.get_or_create(&room_id).await)
}

async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    room: &RoomActor,
) -> Result<(), ApiError> {
    if state.authorizer.is_owner(requester(headers), room).await? {
        Ok(())
    } else {
        tracing::warn!(
            "Rejected control request for room '{}' from {:?}",
            room.room_id(),
            requester(headers)
        );
        Err(ApiError::Forbidden)
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /api/rooms/{room_id}/init`
pub async fn init_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OkResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    authorize(&state, &headers, &room).await?;
    let request: InitRequest = parse_body(&body);
    room.init(request.movie_id, request.owner_id).await?;
    Ok(Json(OkResponse::ok()))
}

/// `GET /api/rooms/{room_id}/state`
pub async fn get_room_state(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<StateResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    let snapshot = room.get_state().await?;
    Ok(Json(snapshot.into()))
}

/// `POST /api/rooms/{room_id}/play`
pub async fn play(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OkResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    authorize(&state, &headers, &room).await?;
    let request: PlayRequest = parse_body(&body);
    let position = request.position.ok_or(ValueObjectError::PositionMissing)?;
    room.play(position, request.movie_id).await?;
    Ok(Json(OkResponse::ok()))
}

/// `POST /api/rooms/{room_id}/pause`
pub async fn pause(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    authorize(&state, &headers, &room).await?;
    room.pause().await?;
    Ok(Json(OkResponse::ok()))
}

/// `POST /api/rooms/{room_id}/seek`
pub async fn seek(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OkResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    authorize(&state, &headers, &room).await?;
    let request: SeekRequest = parse_body(&body);
    let position = request.position.ok_or(ValueObjectError::PositionMissing)?;
    room.seek(position).await?;
    Ok(Json(OkResponse::ok()))
}

/// `GET /api/rooms/{room_id}/chat`
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<ChatListResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    let messages = room.get_chat().await?;

    // Domain Model から DTO への変換
    Ok(Json(ChatListResponse {
        messages: messages.into_iter().map(ChatMessageDto::from).collect(),
    }))
}

/// `POST /api/rooms/{room_id}/chat`
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    body: Bytes,
) -> Result<Json<PostChatResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    let request: PostChatRequest = parse_body(&body);
    let message = room
        .post_chat(
            request.user.as_deref(),
            request.text.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(PostChatResponse {
        ok: true,
        message: message.into(),
    }))
}

/// `DELETE /api/rooms/{room_id}`
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>, ApiError> {
    let room = resolve_room(&state, room_id).await?;
    authorize(&state, &headers, &room).await?;
    state.directory.delete(room.room_id()).await?;
    Ok(Json(OkResponse::ok()))
}
