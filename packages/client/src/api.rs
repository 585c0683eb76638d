//! HTTP access to one room of the watch party server.

use async_trait::async_trait;
use watchparty_server::infrastructure::dto::http::{
    ChatListResponse, ChatMessageDto, PostChatRequest, StateResponse,
};

use crate::error::ClientError;

/// Read / chat operations the reconciler needs from the server
#[async_trait]
pub trait WatchPartyApi: Send + Sync {
    /// Current playback snapshot of the room
    async fn get_state(&self) -> Result<StateResponse, ClientError>;

    /// Chat history, oldest first
    async fn get_chat(&self) -> Result<Vec<ChatMessageDto>, ClientError>;

    /// Post a chat message
    async fn post_chat(&self, user: Option<&str>, text: &str) -> Result<(), ClientError>;
}

/// `WatchPartyApi` over the server's HTTP endpoints
pub struct HttpWatchPartyApi {
    client: reqwest::Client,
    room_url: String,
}

impl HttpWatchPartyApi {
    /// # Arguments
    ///
    /// * `base_url` - Server base URL, e.g. `http://127.0.0.1:8080`
    /// * `room_id` - Room to follow
    pub fn new(base_url: &str, room_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            room_url: format!("{}/api/rooms/{}", base_url.trim_end_matches('/'), room_id),
        }
    }

    pub fn room_url(&self) -> &str {
        &self.room_url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl WatchPartyApi for HttpWatchPartyApi {
    async fn get_state(&self) -> Result<StateResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/state", self.room_url))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn get_chat(&self) -> Result<Vec<ChatMessageDto>, ClientError> {
        let response = self
            .client
            .get(format!("{}/chat", self.room_url))
            .send()
            .await?;
        let list: ChatListResponse = Self::check_status(response).await?.json().await?;
        Ok(list.messages)
    }

    async fn post_chat(&self, user: Option<&str>, text: &str) -> Result<(), ClientError> {
        let request = PostChatRequest {
            user: user.map(str::to_string),
            text: Some(text.to_string()),
        };
        let response = self
            .client
            .post(format!("{}/chat", self.room_url))
            .json(&request)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
