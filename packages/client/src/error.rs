//! Error types for the watch party client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// WebSocket connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// A response or push message had an unexpected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Http(e.to_string())
        }
    }
}
