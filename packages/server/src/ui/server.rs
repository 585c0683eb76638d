//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::RoomDirectory;

use super::{
    authorizer::OwnerAuthorizer,
    handler::{
        delete_room, get_chat, get_room_state, health_check, init_room, pause, play, post_chat,
        seek, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Watch party HTTP / WebSocket server
///
/// This struct encapsulates the server dependencies and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let directory = Arc::new(RoomDirectory::with_repository(repository));
/// let server = Server::new(directory, Arc::new(OwnerHeaderAuthorizer));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// RoomDirectory（ルーム ID → RoomActor）
    directory: Arc<RoomDirectory>,
    /// OwnerAuthorizer（再生操作の権限判定）
    authorizer: Arc<dyn OwnerAuthorizer>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(directory: Arc<RoomDirectory>, authorizer: Arc<dyn OwnerAuthorizer>) -> Self {
        Self {
            directory,
            authorizer,
        }
    }

    /// Build the axum router with all endpoints
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            directory: self.directory.clone(),
            authorizer: self.authorizer.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/api/rooms/{room_id}/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms/{room_id}", delete(delete_room))
            .route("/api/rooms/{room_id}/init", post(init_room))
            .route("/api/rooms/{room_id}/state", get(get_room_state))
            .route("/api/rooms/{room_id}/play", post(play))
            .route("/api/rooms/{room_id}/pause", post(pause))
            .route("/api/rooms/{room_id}/seek", post(seek))
            .route("/api/rooms/{room_id}/chat", get(get_chat).post(post_chat))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the watch party server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Watch party server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Rooms: http://{}/api/rooms/{{room_id}}/state", bind_addr);
        tracing::info!("Push:  ws://{}/api/rooms/{{room_id}}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
