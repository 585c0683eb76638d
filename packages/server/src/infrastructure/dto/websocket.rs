//! WebSocket push message DTOs.
//!
//! One self-describing JSON object per event, tagged by `type`:
//!
//! ```text
//! {"type":"STATE","movieId":"m1","isPlaying":true,"serverTime":12.3}
//! {"type":"PLAY","time":12.3,"movieId":"m1"}
//! {"type":"PAUSE","time":15.0}
//! {"type":"SEEK","time":50.0}
//! {"type":"CHAT","user":"alice","text":"hi","ts":1700000000000}
//! ```

use serde::{Deserialize, Serialize};

/// Push message envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PushMessage {
    #[serde(rename_all = "camelCase")]
    State {
        movie_id: Option<String>,
        is_playing: bool,
        server_time: f64,
    },
    #[serde(rename_all = "camelCase")]
    Play {
        time: f64,
        movie_id: Option<String>,
    },
    Pause {
        time: f64,
    },
    Seek {
        time: f64,
    },
    Chat {
        user: String,
        text: String,
        /// Unix timestamp (milliseconds since epoch)
        ts: i64,
    },
}
