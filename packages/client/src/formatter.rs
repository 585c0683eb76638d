//! Message formatting utilities for client display.

use watchparty_server::infrastructure::dto::{
    http::{ChatMessageDto, StateResponse},
    websocket::PushMessage,
};
use watchparty_shared::time::timestamp_to_jst_rfc3339;

use crate::reconciler::ReconcilerEvent;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a playback offset as `mm:ss`, or `h:mm:ss` past one hour
    pub fn format_position(seconds: f64) -> String {
        let total = seconds.max(0.0).floor() as u64;
        let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }

    /// Format a state snapshot
    pub fn format_state(state: &StateResponse) -> String {
        let status = if state.is_playing { "playing" } else { "paused" };
        format!(
            "[state] {} {} at {} (owner: {})\n",
            state.movie_id.as_deref().unwrap_or("(no movie)"),
            status,
            Self::format_position(state.server_time),
            state.owner_id.as_deref().unwrap_or("-"),
        )
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The chat message as returned by the server
    ///
    /// # Returns
    ///
    /// A formatted string with the chat message
    pub fn format_chat_message(message: &ChatMessageDto) -> String {
        let timestamp_str =
            timestamp_to_jst_rfc3339(message.ts).unwrap_or_else(|| message.ts.to_string());
        format!(
            "\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            message.user, message.text, timestamp_str
        )
    }

    /// Format a reconciler event.
    ///
    /// Returns `None` for events that are rendered elsewhere (chat updates)
    /// or are too chatty to print (unchanged state snapshots).
    pub fn format_event(event: &ReconcilerEvent) -> Option<String> {
        match event {
            ReconcilerEvent::Play { time } => Some(format!(
                "\n▶ play from {}\n",
                Self::format_position(*time)
            )),
            ReconcilerEvent::Pause { time } => Some(format!(
                "\n⏸ paused at {}\n",
                Self::format_position(*time)
            )),
            ReconcilerEvent::Seek { time } => Some(format!(
                "\n⏩ jumped to {}\n",
                Self::format_position(*time)
            )),
            ReconcilerEvent::Connectivity(true) => Some("\n● connected\n".to_string()),
            ReconcilerEvent::Connectivity(false) => {
                Some("\n○ disconnected, retrying...\n".to_string())
            }
            ReconcilerEvent::StateChanged(_) | ReconcilerEvent::ChatUpdated(_) => None,
        }
    }

    /// Format a pushed control message.
    ///
    /// Chat pushes are rendered with `format_chat_message` instead.
    pub fn format_push(message: &PushMessage) -> Option<String> {
        match message {
            PushMessage::State {
                movie_id,
                is_playing,
                server_time,
            } => Some(format!(
                "\n[push] {} {} at {}\n",
                movie_id.as_deref().unwrap_or("(no movie)"),
                if *is_playing { "playing" } else { "paused" },
                Self::format_position(*server_time)
            )),
            PushMessage::Play { time, .. } => Some(format!(
                "\n[push] play from {}\n",
                Self::format_position(*time)
            )),
            PushMessage::Pause { time } => Some(format!(
                "\n[push] paused at {}\n",
                Self::format_position(*time)
            )),
            PushMessage::Seek { time } => Some(format!(
                "\n[push] jumped to {}\n",
                Self::format_position(*time)
            )),
            PushMessage::Chat { .. } => None,
        }
    }
}
