//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::collections::{HashSet, VecDeque};

use watchparty_server::infrastructure::dto::http::ChatMessageDto;

use crate::error::ClientError;

/// Playback as seen by one state poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub is_playing: bool,
    pub server_time: f64,
}

/// Edge derived from two successive observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Play { time: f64 },
    Pause { time: f64 },
    Seek { time: f64 },
}

/// Classify the change between two state polls.
///
/// # Arguments
///
/// * `previous` - Last observation, `None` before the first successful poll
/// * `current` - Observation just received
/// * `elapsed_secs` - Wall time between the two polls
/// * `seek_threshold_secs` - Largest discontinuity treated as clock drift
///
/// # Returns
///
/// The edge to fire, or `None` when playback simply carried on.
/// A first observation of a running room counts as a play edge so a viewer
/// joining mid-playback starts playing.
pub fn classify_transition(
    previous: Option<&Observation>,
    current: &Observation,
    elapsed_secs: f64,
    seek_threshold_secs: f64,
) -> Option<Transition> {
    let Some(previous) = previous else {
        return current.is_playing.then_some(Transition::Play {
            time: current.server_time,
        });
    };

    match (previous.is_playing, current.is_playing) {
        (false, true) => Some(Transition::Play {
            time: current.server_time,
        }),
        (true, false) => Some(Transition::Pause {
            time: current.server_time,
        }),
        (playing, _) => {
            let expected = if playing {
                previous.server_time + elapsed_secs.max(0.0)
            } else {
                previous.server_time
            };
            ((current.server_time - expected).abs() > seek_threshold_secs).then_some(
                Transition::Seek {
                    time: current.server_time,
                },
            )
        }
    }
}

/// Identifies a chat message across pushes and polls
type ChatKey = (i64, String, String);

/// Remembers which chat messages have already been displayed.
///
/// Pushes and polls can arrive in any order, so a message is looked up by
/// its `(ts, user, text)` key rather than by position in the history. Only
/// the newest `limit` keys are kept.
#[derive(Debug)]
pub struct ShownChat {
    keys: HashSet<ChatKey>,
    order: VecDeque<ChatKey>,
    limit: usize,
}

impl ShownChat {
    pub fn new(limit: usize) -> Self {
        Self {
            keys: HashSet::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Messages not displayed yet, in the given order. They are recorded as
    /// displayed.
    pub fn take_unseen<'a>(&mut self, messages: &'a [ChatMessageDto]) -> Vec<&'a ChatMessageDto> {
        messages
            .iter()
            .filter(|message| self.remember(message))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn remember(&mut self, message: &ChatMessageDto) -> bool {
        let key = (message.ts, message.user.clone(), message.text.clone());
        if !self.keys.insert(key.clone()) {
            return false;
        }
        self.order.push_back(key);
        while self.order.len() > self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.keys.remove(&oldest);
            }
        }
        true
    }
}

/// Check if the push listener should try to connect again.
///
/// Client-side rejections (4xx) will not go away by retrying, so they stop
/// the listener straight away.
///
/// # Arguments
///
/// * `error` - The error that ended the last attempt
/// * `current_attempt` - Failed attempts so far
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if let ClientError::UnexpectedStatus { status, .. } = error
        && (400..500).contains(status)
    {
        return false;
    }

    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchparty_server::infrastructure::dto::http::ChatMessageType;

    const THRESHOLD: f64 = 3.0;

    fn playing(server_time: f64) -> Observation {
        Observation {
            is_playing: true,
            server_time,
        }
    }

    fn paused(server_time: f64) -> Observation {
        Observation {
            is_playing: false,
            server_time,
        }
    }

    #[test]
    fn test_paused_to_playing_is_play_edge() {
        // テスト項目: 停止 → 再生の変化は play イベントになる
        // given (前提条件):
        let previous = paused(10.0);

        // when (操作):
        let result = classify_transition(Some(&previous), &playing(10.5), 2.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(result, Some(Transition::Play { time: 10.5 }));
    }

    #[test]
    fn test_playing_to_paused_is_pause_edge() {
        // テスト項目: 再生 → 停止の変化は pause イベントになる
        // given (前提条件):
        let previous = playing(10.0);

        // when (操作):
        let result = classify_transition(Some(&previous), &paused(11.0), 2.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(result, Some(Transition::Pause { time: 11.0 }));
    }

    #[test]
    fn test_normal_progress_is_not_seek() {
        // テスト項目: 経過時間どおりに進んだ再生位置は seek と判定されない
        // given (前提条件):
        let previous = playing(10.0);

        // when (操作): 2 秒後に 12.4 秒（ずれ 0.4 秒）
        let result = classify_transition(Some(&previous), &playing(12.4), 2.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_jump_beyond_threshold_is_seek() {
        // テスト項目: 閾値を超える再生位置の飛びは seek と判定される
        // given (前提条件):
        let previous = playing(10.0);

        // when (操作):
        let forward = classify_transition(Some(&previous), &playing(60.0), 2.0, THRESHOLD);
        let backward = classify_transition(Some(&previous), &playing(5.0), 2.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(forward, Some(Transition::Seek { time: 60.0 }));
        assert_eq!(backward, Some(Transition::Seek { time: 5.0 }));
    }

    #[test]
    fn test_seek_while_paused_uses_no_elapsed_adjustment() {
        // テスト項目: 停止中は経過時間を加味せずに seek を判定する
        // given (前提条件):
        let previous = paused(10.0);

        // when (操作):
        let small = classify_transition(Some(&previous), &paused(12.0), 30.0, THRESHOLD);
        let large = classify_transition(Some(&previous), &paused(14.0), 30.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(small, None);
        assert_eq!(large, Some(Transition::Seek { time: 14.0 }));
    }

    #[test]
    fn test_threshold_is_configurable() {
        // テスト項目: seek 判定の閾値を変更できる
        // given (前提条件):
        let previous = paused(10.0);

        // when (操作):
        let strict = classify_transition(Some(&previous), &paused(11.5), 0.0, 1.0);
        let lenient = classify_transition(Some(&previous), &paused(11.5), 0.0, 5.0);

        // then (期待する結果):
        assert_eq!(strict, Some(Transition::Seek { time: 11.5 }));
        assert_eq!(lenient, None);
    }

    #[test]
    fn test_first_observation() {
        // テスト項目: 初回の観測は再生中なら play、停止中なら何も起きない
        // given (前提条件):

        // when (操作):
        let running = classify_transition(None, &playing(42.0), 0.0, THRESHOLD);
        let idle = classify_transition(None, &paused(42.0), 0.0, THRESHOLD);

        // then (期待する結果):
        assert_eq!(running, Some(Transition::Play { time: 42.0 }));
        assert_eq!(idle, None);
    }

    fn chat(user: &str, ts: i64) -> ChatMessageDto {
        ChatMessageDto {
            r#type: ChatMessageType::Chat,
            user: user.to_string(),
            text: format!("message {}", ts),
            ts,
        }
    }

    #[test]
    fn test_shown_chat_skips_displayed_messages() {
        // テスト項目: 表示済みのメッセージは除かれ、未表示のものだけが順番どおりに返される
        // given (前提条件):
        let mut shown = ShownChat::new(10);
        shown.take_unseen(&[chat("bob", 2)]);
        let messages = vec![chat("alice", 1), chat("bob", 2), chat("alice", 3)];

        // when (操作):
        let unseen = shown.take_unseen(&messages);
        let again = shown.take_unseen(&messages);

        // then (期待する結果):
        assert_eq!(unseen, vec![&chat("alice", 1), &chat("alice", 3)]);
        assert!(again.is_empty());
        assert_eq!(shown.len(), 3);
    }

    #[test]
    fn test_shown_chat_forgets_oldest_keys_beyond_limit() {
        // テスト項目: 上限を超えた古いキーから忘れられる
        // given (前提条件):
        let mut shown = ShownChat::new(2);
        shown.take_unseen(&[chat("alice", 1), chat("bob", 2), chat("carol", 3)]);

        // when (操作):
        let alice = [chat("alice", 1)];
        let carol = [chat("carol", 3)];
        let forgotten = shown.take_unseen(&alice);
        let remembered = shown.take_unseen(&carol);

        // then (期待する結果):
        assert_eq!(forgotten.len(), 1);
        assert!(remembered.is_empty());
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::Connection("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 3, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Connection("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_after_client_error_status() {
        // テスト項目: 4xx で拒否された場合は再接続しない
        // given (前提条件):
        let rejected = ClientError::UnexpectedStatus {
            status: 400,
            body: "InvalidRoomId".to_string(),
        };
        let unavailable = ClientError::UnexpectedStatus {
            status: 503,
            body: String::new(),
        };

        // when (操作):
        let rejected = should_attempt_reconnect(&rejected, 0, 5);
        let unavailable = should_attempt_reconnect(&unavailable, 0, 5);

        // then (期待する結果):
        assert!(!rejected);
        assert!(unavailable);
    }
}
