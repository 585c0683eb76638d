//! Test fixtures: an in-process server bound to an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use tokio::task::JoinHandle;
use watchparty_server::{
    infrastructure::repository::InMemoryRoomRepository,
    ui::{AllowAllAuthorizer, OwnerAuthorizer, OwnerHeaderAuthorizer, Server},
    usecase::RoomDirectory,
};

/// Helper struct to manage the server task lifecycle
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server that requires the owner header for control requests
    pub async fn start() -> Self {
        Self::start_with(Arc::new(OwnerHeaderAuthorizer)).await
    }

    /// Start a server that trusts every caller
    pub async fn start_open() -> Self {
        Self::start_with(Arc::new(AllowAllAuthorizer)).await
    }

    async fn start_with(authorizer: Arc<dyn OwnerAuthorizer>) -> Self {
        let directory = Arc::new(RoomDirectory::with_repository(Arc::new(
            InMemoryRoomRepository::new(),
        )));
        let app = Server::new(directory, authorizer).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        TestServer { addr, handle }
    }

    /// Base HTTP URL, e.g. `http://127.0.0.1:12345`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// HTTP URL of a room endpoint
    pub fn room_url(&self, room_id: &str, path: &str) -> String {
        format!("{}/api/rooms/{}{}", self.base_url(), room_id, path)
    }

    /// WebSocket URL of a room
    pub fn ws_url(&self, room_id: &str) -> String {
        format!("ws://{}/api/rooms/{}/ws", self.addr, room_id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Stop the server task when the test ends
        self.handle.abort();
    }
}
