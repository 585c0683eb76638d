//! Mapping of engine errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::ValueObjectError,
    infrastructure::dto::http::ErrorResponse,
    usecase::RoomError,
};

/// Error returned by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Engine-level failure
    Room(RoomError),
    /// Requester is not the room owner
    Forbidden,
}

impl From<RoomError> for ApiError {
    fn from(e: RoomError) -> Self {
        ApiError::Room(e)
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError::Room(RoomError::Validation(e))
    }
}

/// Stable machine-readable code for a validation failure
fn validation_code(e: &ValueObjectError) -> &'static str {
    match e {
        ValueObjectError::ChatTextEmpty => "EmptyMessage",
        ValueObjectError::PositionMissing
        | ValueObjectError::PositionNotFinite(_)
        | ValueObjectError::PositionNegative(_) => "InvalidPosition",
        ValueObjectError::RoomIdEmpty
        | ValueObjectError::RoomIdTooLong { .. }
        | ValueObjectError::RoomIdInvalidFormat(_) => "InvalidRoomId",
        ValueObjectError::MovieIdEmpty | ValueObjectError::UserIdEmpty => "ValidationError",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Room(RoomError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, validation_code(e), e.to_string())
            }
            ApiError::Room(RoomError::Storage(e)) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "StorageError",
                    e.to_string(),
                )
            }
            ApiError::Room(RoomError::RoomDeleted) => (
                StatusCode::CONFLICT,
                "RoomDeleted",
                RoomError::RoomDeleted.to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "NotOwner",
                "Only the room owner can control playback".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
