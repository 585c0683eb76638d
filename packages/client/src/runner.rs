//! Client execution logic: polling, optional push and chat input.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use watchparty_server::infrastructure::dto::{
    http::{ChatMessageDto, ChatMessageType},
    websocket::PushMessage,
};

use crate::{
    api::HttpWatchPartyApi,
    domain::ShownChat,
    error::ClientError,
    formatter::MessageFormatter,
    push::PushListener,
    reconciler::{ClientReconciler, ReconcilerConfig, ReconcilerEvent},
    ui::redisplay_prompt,
};

/// Everything the CLI needs to follow a room
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Server base URL, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    pub room_id: String,
    /// Chat display name
    pub user: Option<String>,
    pub reconciler: ReconcilerConfig,
    /// Also subscribe to the WebSocket push channel
    pub push: bool,
}

/// Keys remembered by the chat view, twice the server's history size
const SHOWN_CHAT_LIMIT: usize = 200;

/// Tracks which chat messages have already been printed
struct ChatView {
    shown: ShownChat,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            shown: ShownChat::new(SHOWN_CHAT_LIMIT),
        }
    }
}

impl ChatView {
    fn show(&mut self, messages: &[ChatMessageDto]) -> String {
        self.shown
            .take_unseen(messages)
            .into_iter()
            .map(MessageFormatter::format_chat_message)
            .collect()
    }
}

/// Run the viewer until stdin is closed (Ctrl+D) or interrupted (Ctrl+C)
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let api = Arc::new(HttpWatchPartyApi::new(&options.base_url, &options.room_id));
    tracing::info!("Following room at {}", api.room_url());

    let (reconciler, mut events) = ClientReconciler::spawn(api, options.reconciler.clone());

    // Push listener is optional; polling alone keeps the view consistent
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<PushMessage>();
    let push_task = if options.push {
        let listener = PushListener::new(&options.base_url, &options.room_id);
        Some(tokio::spawn(async move {
            if let Err(e) = listener.run(push_tx).await {
                tracing::warn!("Push listener stopped: {}", e);
            }
        }))
    } else {
        drop(push_tx);
        None
    };

    let prompt_user = options.user.clone().unwrap_or_else(|| "Anonymous".to_string());
    println!(
        "\nWatching room '{}' as '{}'. Type messages and press Enter to chat. Press Ctrl+C to exit.\n",
        options.room_id, prompt_user
    );

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", prompt_user);

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    let mut chat_view = ChatView::default();
    let mut state_shown = false;
    let mut push_open = options.push;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let output = match &event {
                    ReconcilerEvent::StateChanged(state) if !state_shown => {
                        state_shown = true;
                        Some(MessageFormatter::format_state(state))
                    }
                    ReconcilerEvent::ChatUpdated(messages) => {
                        Some(chat_view.show(messages)).filter(|s| !s.is_empty())
                    }
                    other => MessageFormatter::format_event(other),
                };
                if let Some(output) = output {
                    print!("{}", output);
                    redisplay_prompt(&prompt_user);
                }
            }
            push = push_rx.recv(), if push_open => {
                let output = match push {
                    Some(PushMessage::Chat { user, text, ts }) => {
                        let message = ChatMessageDto {
                            r#type: ChatMessageType::Chat,
                            user,
                            text,
                            ts,
                        };
                        Some(chat_view.show(std::slice::from_ref(&message)))
                    }
                    Some(other) => MessageFormatter::format_push(&other),
                    None => {
                        push_open = false;
                        None
                    }
                };
                if let Some(output) = output.filter(|s| !s.is_empty()) {
                    print!("{}", output);
                    redisplay_prompt(&prompt_user);
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else { break };
                reconciler.send_chat(options.user.clone(), line)?;
            }
        }
    }

    if let Some(push_task) = push_task {
        push_task.abort();
    }
    reconciler.shutdown().await;
    tracing::info!("Client session ended normally");
    Ok(())
}
