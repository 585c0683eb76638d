//! Projection of a stored playback record onto the wall clock.
//!
//! `project_server_time` is the single derivation of `serverTime`. State
//! reads, `pause` and the snapshot sent to new connections all go through it.

use super::value_object::{PlaybackPosition, Timestamp};

/// Compute the live playback offset (seconds) of a room at `now`.
///
/// While playing, the wall-clock time elapsed since `updated_at` is added to
/// the stored position. Elapsed time is clamped at zero so a clock that steps
/// backwards never rewinds playback.
pub fn project_server_time(
    position: PlaybackPosition,
    is_playing: bool,
    updated_at: Timestamp,
    now: Timestamp,
) -> f64 {
    if !is_playing {
        return position.seconds();
    }
    let elapsed_millis = (now.value() - updated_at.value()).max(0);
    position.seconds() + elapsed_millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(seconds: f64) -> PlaybackPosition {
        PlaybackPosition::new(seconds).unwrap()
    }

    #[test]
    fn test_paused_projection_ignores_elapsed_time() {
        // テスト項目: 一時停止中は経過時間に関わらず保存位置がそのまま返る
        // given (前提条件):
        let updated_at = Timestamp::new(1_000);

        // when (操作):
        let result = project_server_time(position(42.0), false, updated_at, Timestamp::new(61_000));

        // then (期待する結果):
        assert_eq!(result, 42.0);
    }

    #[test]
    fn test_playing_projection_adds_elapsed_seconds() {
        // テスト項目: 再生中は経過ミリ秒が秒に換算されて加算される
        // given (前提条件):
        let updated_at = Timestamp::new(10_000);

        // when (操作):
        let result = project_server_time(position(10.0), true, updated_at, Timestamp::new(15_250));

        // then (期待する結果):
        assert!((result - 15.25).abs() < 1e-9);
    }

    #[test]
    fn test_playing_projection_clamps_clock_going_backwards() {
        // テスト項目: 時計が巻き戻っても再生位置は保存位置より前にならない
        // given (前提条件):
        let updated_at = Timestamp::new(10_000);

        // when (操作):
        let result = project_server_time(position(5.0), true, updated_at, Timestamp::new(9_000));

        // then (期待する結果):
        assert_eq!(result, 5.0);
    }
}
