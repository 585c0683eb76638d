//! Watch party synchronization server.
//!
//! Serves the room command API over HTTP and pushes room events over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-server
//! cargo run --bin watchparty-server -- --host 0.0.0.0 --port 3000 --auth none
//! ```

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use watchparty_server::{
    infrastructure::repository::InMemoryRoomRepository,
    ui::{AllowAllAuthorizer, OwnerAuthorizer, OwnerHeaderAuthorizer, Server},
    usecase::{RoomDirectory, RoomDirectoryConfig},
};
use watchparty_shared::{logger::setup_logger, time::SystemClock};

/// Authorization policy applied to control requests
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AuthMode {
    /// Trust every caller
    None,
    /// Require the `x-user-id` header to match the room owner
    OwnerHeader,
}

#[derive(Parser, Debug)]
#[command(name = "watchparty-server")]
#[command(about = "Watch party server with synchronized playback and chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of chat messages kept per room (1 to 100)
    #[arg(
        long,
        default_value = "100",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=100)
    )]
    chat_capacity: usize,

    /// Authorization policy for play / pause / seek / init / delete
    #[arg(long, value_enum, default_value = "owner-header")]
    auth: AuthMode,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Repository (in-memory database)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. RoomDirectory
    let directory = Arc::new(RoomDirectory::new(
        repository,
        Arc::new(SystemClock),
        RoomDirectoryConfig {
            chat_capacity: args.chat_capacity,
        },
    ));

    // 3. Authorizer
    let authorizer: Arc<dyn OwnerAuthorizer> = match args.auth {
        AuthMode::None => Arc::new(AllowAllAuthorizer),
        AuthMode::OwnerHeader => Arc::new(OwnerHeaderAuthorizer),
    };
    tracing::info!("Authorization mode: {:?}", args.auth);

    // 4. Create and run the server
    let server = Server::new(directory, authorizer);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_capacity_defaults_to_100() {
        // テスト項目: --chat-capacity 未指定時は 100 になる
        // given (前提条件):
        let argv = ["watchparty-server"];

        // when (操作):
        let args = Args::try_parse_from(argv).unwrap();

        // then (期待する結果):
        assert_eq!(args.chat_capacity, 100);
    }

    #[test]
    fn test_chat_capacity_out_of_range_is_rejected() {
        // テスト項目: --chat-capacity は 1〜100 の範囲外を受け付けない
        // given (前提条件):

        // when (操作):
        let zero = Args::try_parse_from(["watchparty-server", "--chat-capacity", "0"]);
        let too_many = Args::try_parse_from(["watchparty-server", "--chat-capacity", "101"]);
        let small = Args::try_parse_from(["watchparty-server", "--chat-capacity", "20"]);

        // then (期待する結果):
        assert!(zero.is_err());
        assert!(too_many.is_err());
        assert_eq!(small.unwrap().chat_capacity, 20);
    }
}
