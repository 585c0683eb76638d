//! Polling reconciler for one viewer.
//!
//! Polls room state and chat on two independent intervals, derives
//! play / pause / seek edges from successive state snapshots and reports
//! everything as `ReconcilerEvent`s. It never writes playback state, so a
//! lost or duplicated WebSocket push is healed by the next poll.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use watchparty_server::infrastructure::dto::http::{ChatMessageDto, StateResponse};

use crate::{
    api::WatchPartyApi,
    domain::{Observation, Transition, classify_transition},
    error::ClientError,
};

/// Poll cadences and edge detection settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    pub state_interval: Duration,
    pub chat_interval: Duration,
    /// Discontinuity (seconds) above which a state change counts as a seek
    pub seek_threshold_secs: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            state_interval: Duration::from_millis(2000),
            chat_interval: Duration::from_millis(3000),
            seek_threshold_secs: 3.0,
        }
    }
}

/// Event reported to the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcilerEvent {
    Play { time: f64 },
    Pause { time: f64 },
    Seek { time: f64 },
    /// Raw snapshot of every successful state poll
    StateChanged(StateResponse),
    /// Full chat history, emitted when it differs from the last poll
    ChatUpdated(Vec<ChatMessageDto>),
    /// `true` while polls succeed, `false` after a failed poll
    Connectivity(bool),
}

impl From<Transition> for ReconcilerEvent {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Play { time } => ReconcilerEvent::Play { time },
            Transition::Pause { time } => ReconcilerEvent::Pause { time },
            Transition::Seek { time } => ReconcilerEvent::Seek { time },
        }
    }
}

enum Command {
    SendChat { user: Option<String>, text: String },
}

/// Handle to a running reconciler task.
///
/// Dropping the handle stops the task.
pub struct ReconcilerHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// Post a chat message, then re-poll chat immediately
    pub fn send_chat(&self, user: Option<String>, text: String) -> Result<(), ClientError> {
        self.commands
            .send(Command::SendChat { user, text })
            .map_err(|_| ClientError::Connection("Reconciler has stopped".to_string()))
    }

    /// Stop polling and wait for the task to finish
    pub async fn shutdown(self) {
        let Self { commands, task } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::warn!("Reconciler task ended abnormally: {}", e);
        }
    }
}

/// Collaborator-side loop keeping a viewer in step with the room
pub struct ClientReconciler {
    api: Arc<dyn WatchPartyApi>,
    config: ReconcilerConfig,
    events: mpsc::UnboundedSender<ReconcilerEvent>,
    previous: Option<(Observation, Instant)>,
    last_chat: Option<Vec<ChatMessageDto>>,
    connected: Option<bool>,
}

impl ClientReconciler {
    /// Start polling in a background task.
    ///
    /// Both intervals tick immediately, so the first state and chat polls
    /// happen right away.
    pub fn spawn(
        api: Arc<dyn WatchPartyApi>,
        config: ReconcilerConfig,
    ) -> (ReconcilerHandle, mpsc::UnboundedReceiver<ReconcilerEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let reconciler = Self {
            api,
            config,
            events: events_tx,
            previous: None,
            last_chat: None,
            connected: None,
        };
        let task = tokio::spawn(reconciler.run(commands_rx));

        (
            ReconcilerHandle {
                commands: commands_tx,
                task,
            },
            events_rx,
        )
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        // A zero period would make `interval` panic
        let min_period = Duration::from_millis(1);
        let mut state_tick = tokio::time::interval(self.config.state_interval.max(min_period));
        let mut chat_tick = tokio::time::interval(self.config.chat_interval.max(min_period));
        state_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        chat_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = state_tick.tick() => self.poll_state().await,
                _ = chat_tick.tick() => self.poll_chat().await,
                command = commands.recv() => match command {
                    Some(Command::SendChat { user, text }) => {
                        self.send_chat(user.as_deref(), &text).await;
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("Reconciler stopped");
    }

    async fn poll_state(&mut self) {
        let state = match self.api.get_state().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("State poll failed: {}", e);
                self.set_connected(false);
                return;
            }
        };
        self.set_connected(true);

        let now = Instant::now();
        let current = Observation {
            is_playing: state.is_playing,
            server_time: state.server_time,
        };
        let elapsed_secs = self
            .previous
            .map(|(_, at)| now.duration_since(at).as_secs_f64())
            .unwrap_or_default();
        let transition = classify_transition(
            self.previous.as_ref().map(|(observation, _)| observation),
            &current,
            elapsed_secs,
            self.config.seek_threshold_secs,
        );
        self.previous = Some((current, now));

        if let Some(transition) = transition {
            tracing::debug!("Detected {:?}", transition);
            self.emit(transition.into());
        }
        self.emit(ReconcilerEvent::StateChanged(state));
    }

    async fn poll_chat(&mut self) {
        let messages = match self.api.get_chat().await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Chat poll failed: {}", e);
                self.set_connected(false);
                return;
            }
        };
        self.set_connected(true);

        if self.last_chat.as_ref() != Some(&messages) {
            self.last_chat = Some(messages.clone());
            self.emit(ReconcilerEvent::ChatUpdated(messages));
        }
    }

    async fn send_chat(&mut self, user: Option<&str>, text: &str) {
        if let Err(e) = self.api.post_chat(user, text).await {
            tracing::warn!("Failed to send chat message: {}", e);
        }
        self.poll_chat().await;
    }

    fn set_connected(&mut self, connected: bool) {
        if self.connected == Some(connected) {
            return;
        }
        if connected {
            tracing::info!("Connected to room");
        } else {
            tracing::warn!("Lost connection to room");
        }
        self.connected = Some(connected);
        self.emit(ReconcilerEvent::Connectivity(connected));
    }

    fn emit(&self, event: ReconcilerEvent) {
        // Receiver may already be gone during shutdown
        let _ = self.events.send(event);
    }
}
