//! Core domain models for the watch party room.

use std::collections::VecDeque;

use super::{
    clock::project_server_time,
    value_object::{ChatText, MovieId, PlaybackPosition, Timestamp, UserId, Username},
};

/// Default number of chat messages kept per room
pub const DEFAULT_CHAT_CAPACITY: usize = 100;

/// Display name used when a chat message carries no user
pub const ANONYMOUS_USER: &str = "Anonymous";

/// Authoritative playback record of one room.
///
/// `position` is only meaningful together with `updated_at` and `is_playing`;
/// read the live offset through [`RoomState::server_time`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    /// Content currently loaded (None before initialization)
    pub movie_id: Option<MovieId>,
    /// Playback offset at the moment `updated_at` was recorded
    pub position: PlaybackPosition,
    /// Whether playback is running
    pub is_playing: bool,
    /// Wall-clock moment `position` / `is_playing` were last set
    pub updated_at: Timestamp,
    /// Identity allowed to control playback; set by `init` only
    pub owner_id: Option<UserId>,
}

impl RoomState {
    /// Zero-value state served for rooms that were never initialized
    pub fn uninitialized(now: Timestamp) -> Self {
        Self {
            movie_id: None,
            position: PlaybackPosition::ZERO,
            is_playing: false,
            updated_at: now,
            owner_id: None,
        }
    }

    /// Fresh state for `init`, discarding whatever was there before
    pub fn initialized(movie_id: Option<MovieId>, owner_id: Option<UserId>, now: Timestamp) -> Self {
        Self {
            movie_id,
            owner_id,
            ..Self::uninitialized(now)
        }
    }

    /// Live playback offset at `now`
    pub fn server_time(&self, now: Timestamp) -> f64 {
        project_server_time(self.position, self.is_playing, self.updated_at, now)
    }

    /// Start playback at `position`, optionally switching content
    pub fn play(&mut self, position: PlaybackPosition, movie_id: Option<MovieId>, now: Timestamp) {
        self.is_playing = true;
        self.position = position;
        self.updated_at = now;
        if movie_id.is_some() {
            self.movie_id = movie_id;
        }
    }

    /// Freeze playback at the projected offset and return that offset.
    ///
    /// The projection must happen before `updated_at` moves, otherwise the
    /// time elapsed since the last command would be lost.
    pub fn pause(&mut self, now: Timestamp) -> PlaybackPosition {
        let frozen = PlaybackPosition::new(self.server_time(now)).unwrap_or(self.position);
        self.position = frozen;
        self.is_playing = false;
        self.updated_at = now;
        frozen
    }

    /// Jump to `position` without changing play/pause
    pub fn seek(&mut self, position: PlaybackPosition, now: Timestamp) {
        self.position = position;
        self.updated_at = now;
    }

    /// Read-side view with `server_time` computed at `now`
    pub fn snapshot(&self, now: Timestamp) -> PlaybackSnapshot {
        PlaybackSnapshot {
            movie_id: self.movie_id.clone(),
            is_playing: self.is_playing,
            server_time: self.server_time(now),
            owner_id: self.owner_id.clone(),
        }
    }
}

/// Result of `getState`: playback as seen right now
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub movie_id: Option<MovieId>,
    pub is_playing: bool,
    pub server_time: f64,
    pub owner_id: Option<UserId>,
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Client-supplied display name
    pub user: Username,
    /// Message body
    pub text: ChatText,
    /// Timestamp when the message was posted
    pub ts: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(user: Username, text: ChatText, ts: Timestamp) -> Self {
        Self { user, text, ts }
    }
}

/// Bounded, insertion-ordered chat history.
///
/// Once `capacity` is reached the oldest message is evicted on every append.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    /// Create an empty log keeping at most `capacity` messages
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(DEFAULT_CHAT_CAPACITY)),
            capacity,
        }
    }

    /// Rebuild a log from stored messages, keeping only the newest `capacity`
    pub fn from_messages(messages: Vec<ChatMessage>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for message in messages {
            log.push(message);
        }
        log
    }

    /// Append a message, evicting from the front beyond capacity
    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Messages oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn into_vec(self) -> Vec<ChatMessage> {
        self.messages.into()
    }
}

/// Event fanned out to every push connection of a room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Full snapshot, sent to a connection right after it registers
    State {
        movie_id: Option<MovieId>,
        is_playing: bool,
        server_time: f64,
    },
    Play {
        time: f64,
        movie_id: Option<MovieId>,
    },
    Pause {
        time: f64,
    },
    Seek {
        time: f64,
    },
    Chat(ChatMessage),
}

impl From<PlaybackSnapshot> for RoomEvent {
    fn from(snapshot: PlaybackSnapshot) -> Self {
        RoomEvent::State {
            movie_id: snapshot.movie_id,
            is_playing: snapshot.is_playing,
            server_time: snapshot.server_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(seconds: f64) -> PlaybackPosition {
        PlaybackPosition::new(seconds).unwrap()
    }

    fn message(n: usize) -> ChatMessage {
        ChatMessage::new(
            Username::new(Some("alice")),
            ChatText::new(&format!("message {}", n)).unwrap(),
            Timestamp::new(n as i64),
        )
    }

    #[test]
    fn test_uninitialized_state_is_zero_value() {
        // テスト項目: 未初期化の RoomState はゼロ値になる
        // given (前提条件):
        let now = Timestamp::new(1_000);

        // when (操作):
        let state = RoomState::uninitialized(now);

        // then (期待する結果):
        assert_eq!(state.movie_id, None);
        assert_eq!(state.owner_id, None);
        assert!(!state.is_playing);
        assert_eq!(state.server_time(Timestamp::new(9_000)), 0.0);
    }

    #[test]
    fn test_pause_preserves_elapsed_time() {
        // テスト項目: 10 秒から再生して 5 秒後に一時停止すると 15 秒で止まる
        // given (前提条件):
        let mut state = RoomState::initialized(None, None, Timestamp::new(0));
        state.play(position(10.0), None, Timestamp::new(1_000));

        // when (操作):
        let frozen = state.pause(Timestamp::new(6_000));

        // then (期待する結果):
        assert_eq!(frozen.seconds(), 15.0);
        assert!(!state.is_playing);
        assert_eq!(state.server_time(Timestamp::new(60_000)), 15.0);
    }

    #[test]
    fn test_play_keeps_movie_and_owner_when_not_supplied() {
        // テスト項目: play で movieId を省略すると既存の movieId と ownerId が保持される
        // given (前提条件):
        let movie = MovieId::new("m1".to_string()).unwrap();
        let owner = UserId::new("u1".to_string()).unwrap();
        let mut state =
            RoomState::initialized(Some(movie.clone()), Some(owner.clone()), Timestamp::new(0));

        // when (操作):
        state.play(position(3.0), None, Timestamp::new(100));

        // then (期待する結果):
        assert_eq!(state.movie_id, Some(movie));
        assert_eq!(state.owner_id, Some(owner));
        assert!(state.is_playing);

        // when (操作): movieId を指定すると差し替わる
        let other = MovieId::new("m2".to_string()).unwrap();
        state.play(position(0.0), Some(other.clone()), Timestamp::new(200));

        // then (期待する結果):
        assert_eq!(state.movie_id, Some(other));
    }

    #[test]
    fn test_seek_keeps_play_state() {
        // テスト項目: seek は再生/停止の状態を変えずに位置だけを変更する
        // given (前提条件):
        let mut state = RoomState::initialized(None, None, Timestamp::new(0));
        state.play(position(0.0), None, Timestamp::new(0));

        // when (操作):
        state.seek(position(50.0), Timestamp::new(2_000));

        // then (期待する結果):
        assert!(state.is_playing);
        assert_eq!(state.server_time(Timestamp::new(2_000)), 50.0);
        assert_eq!(state.server_time(Timestamp::new(3_000)), 51.0);
    }

    #[test]
    fn test_chat_log_evicts_oldest_first() {
        // テスト項目: 150 件追加すると最新 100 件が元の順序で残る
        // given (前提条件):
        let mut log = ChatLog::new(DEFAULT_CHAT_CAPACITY);

        // when (操作):
        for n in 0..150 {
            log.push(message(n));
        }

        // then (期待する結果):
        assert_eq!(log.len(), 100);
        let timestamps: Vec<i64> = log.iter().map(|m| m.ts.value()).collect();
        let expected: Vec<i64> = (50..150).collect();
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn test_chat_log_from_messages_truncates_to_capacity() {
        // テスト項目: 保存済みメッセージから復元する際も容量を超えた古いものは捨てられる
        // given (前提条件):
        let stored: Vec<ChatMessage> = (0..5).map(message).collect();

        // when (操作):
        let log = ChatLog::from_messages(stored, 3);

        // then (期待する結果):
        let timestamps: Vec<i64> = log.into_vec().iter().map(|m| m.ts.value()).collect();
        assert_eq!(timestamps, vec![2, 3, 4]);
    }
}
