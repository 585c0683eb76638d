//! Watch party viewer with polling reconciliation and optional push.
//!
//! Follows one room: prints play / pause / seek changes and chat, and sends
//! every line typed on stdin as a chat message. State is polled every 2
//! seconds and chat every 3 seconds; the WebSocket push channel reconnects
//! up to 5 times with a 5 second interval.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-client -- --room movie-night --user alice
//! cargo run --bin watchparty-client -- -r movie-night --seek-threshold-secs 5 --no-push
//! ```

use std::time::Duration;

use clap::Parser;

use watchparty_client::{ClientOptions, ReconcilerConfig, run_client};
use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-client")]
#[command(about = "Watch party viewer that keeps in step with a room", long_about = None)]
struct Args {
    /// Server base URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Room to follow
    #[arg(short = 'r', long)]
    room: String,

    /// Display name used for chat messages
    #[arg(long)]
    user: Option<String>,

    /// State poll interval in milliseconds
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    state_interval_ms: u64,

    /// Chat poll interval in milliseconds
    #[arg(long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    chat_interval_ms: u64,

    /// Jump (seconds) beyond which a state change is reported as a seek
    #[arg(long, default_value_t = 3.0)]
    seek_threshold_secs: f64,

    /// Poll only, without the WebSocket push channel
    #[arg(long)]
    no_push: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    let options = ClientOptions {
        base_url: args.url,
        room_id: args.room,
        user: args.user,
        reconciler: ReconcilerConfig {
            state_interval: Duration::from_millis(args.state_interval_ms),
            chat_interval: Duration::from_millis(args.chat_interval_ms),
            seek_threshold_secs: args.seek_threshold_secs,
        },
        push: !args.no_push,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
