//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum number of characters kept from a chat message
pub const CHAT_TEXT_MAX_CHARS: usize = 500;

/// Maximum length of a room identifier
const ROOM_ID_MAX_LEN: usize = 100;

/// Room identifier value object.
///
/// Opaque to the engine, but restricted to URL-path safe characters so it can
/// be embedded in `/api/rooms/{room_id}` without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.chars().count();
        if len > ROOM_ID_MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LEN,
                actual: len,
            });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValueObjectError::RoomIdInvalidFormat(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the content loaded into a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.trim().is_empty() {
            return Err(ValueObjectError::MovieIdEmpty);
        }
        Ok(Self(id))
    }

    /// Blank or missing input means "no movie" rather than an error.
    pub fn from_optional(id: Option<String>) -> Option<Self> {
        id.and_then(|id| Self::new(id).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the room owner, as issued by the external auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.trim().is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        Ok(Self(id))
    }

    /// Blank or missing input means "no owner" rather than an error.
    pub fn from_optional(id: Option<String>) -> Option<Self> {
        id.and_then(|id| Self::new(id).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback offset in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct PlaybackPosition(f64);

impl PlaybackPosition {
    /// Start of the content.
    pub const ZERO: Self = Self(0.0);

    /// Create a new PlaybackPosition.
    ///
    /// # Errors
    ///
    /// Returns an error for NaN, infinite or negative offsets
    pub fn new(seconds: f64) -> Result<Self, ValueObjectError> {
        if !seconds.is_finite() {
            return Err(ValueObjectError::PositionNotFinite(seconds));
        }
        if seconds < 0.0 {
            return Err(ValueObjectError::PositionNegative(seconds));
        }
        Ok(Self(seconds))
    }

    /// Get the offset in seconds.
    pub fn seconds(&self) -> f64 {
        self.0
    }
}

/// Chat message body: trimmed, non-empty, at most `CHAT_TEXT_MAX_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText(String);

impl ChatText {
    /// Create a new ChatText.
    ///
    /// Surrounding whitespace is trimmed and anything beyond
    /// `CHAT_TEXT_MAX_CHARS` characters is cut off.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::ChatTextEmpty` if nothing remains after trimming
    pub fn new(text: &str) -> Result<Self, ValueObjectError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::ChatTextEmpty);
        }
        Ok(Self(trimmed.chars().take(CHAT_TEXT_MAX_CHARS).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Client-supplied chat label. Unauthenticated; falls back to "Anonymous".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(user: Option<&str>) -> Self {
        match user.map(str::trim) {
            Some(user) if !user.is_empty() => Self(user.to_string()),
            _ => Self(super::entity::ANONYMOUS_USER.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Timestamp value object.
///
/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_url_safe_ids() {
        // テスト項目: URL セーフな文字列から RoomId を生成できる
        // given (前提条件):
        let id = "room-42_abc".to_string();

        // when (操作):
        let result = RoomId::new(id);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "room-42_abc");
    }

    #[test]
    fn test_room_id_rejects_invalid_input() {
        // テスト項目: 空文字・長すぎる文字列・不正文字を含む RoomId は拒否される
        // given (前提条件):
        let too_long = "a".repeat(101);

        // when (操作):
        let empty = RoomId::new(String::new());
        let long = RoomId::new(too_long);
        let slash = RoomId::new("a/b".to_string());

        // then (期待する結果):
        assert_eq!(empty, Err(ValueObjectError::RoomIdEmpty));
        assert_eq!(
            long,
            Err(ValueObjectError::RoomIdTooLong {
                max: 100,
                actual: 101
            })
        );
        assert!(matches!(
            slash,
            Err(ValueObjectError::RoomIdInvalidFormat(_))
        ));
    }

    #[test]
    fn test_optional_ids_treat_blank_as_missing() {
        // テスト項目: 空白のみの MovieId / UserId は None として扱われる
        // given (前提条件):
        let blank = Some("   ".to_string());

        // when (操作):
        let movie = MovieId::from_optional(blank.clone());
        let owner = UserId::from_optional(blank);
        let present = MovieId::from_optional(Some("m1".to_string()));

        // then (期待する結果):
        assert!(movie.is_none());
        assert!(owner.is_none());
        assert_eq!(present.unwrap().as_str(), "m1");
    }

    #[test]
    fn test_playback_position_validation() {
        // テスト項目: 負の値や非有限値の再生位置は拒否される
        // given (前提条件):

        // when (操作):
        let ok = PlaybackPosition::new(12.5);
        let negative = PlaybackPosition::new(-1.0);
        let nan = PlaybackPosition::new(f64::NAN);
        let inf = PlaybackPosition::new(f64::INFINITY);

        // then (期待する結果):
        assert_eq!(ok.unwrap().seconds(), 12.5);
        assert_eq!(negative, Err(ValueObjectError::PositionNegative(-1.0)));
        assert!(matches!(nan, Err(ValueObjectError::PositionNotFinite(_))));
        assert!(matches!(inf, Err(ValueObjectError::PositionNotFinite(_))));
    }

    #[test]
    fn test_chat_text_is_trimmed_and_truncated() {
        // テスト項目: ChatText は前後の空白が除去され、500 文字に切り詰められる
        // given (前提条件):
        let long = format!("  {}  ", "あ".repeat(600));

        // when (操作):
        let text = ChatText::new(&long).unwrap();
        let short = ChatText::new("  hello ").unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str().chars().count(), CHAT_TEXT_MAX_CHARS);
        assert_eq!(short.as_str(), "hello");
    }

    #[test]
    fn test_chat_text_rejects_whitespace_only() {
        // テスト項目: 空白のみのチャットは EmptyMessage として拒否される
        // given (前提条件):
        let text = "   \n\t ";

        // when (操作):
        let result = ChatText::new(text);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::ChatTextEmpty));
    }

    #[test]
    fn test_username_defaults_to_anonymous() {
        // テスト項目: ユーザー名が未指定・空白の場合は Anonymous になる
        // given (前提条件):

        // when (操作):
        let missing = Username::new(None);
        let blank = Username::new(Some("  "));
        let named = Username::new(Some(" alice "));

        // then (期待する結果):
        assert_eq!(missing.as_str(), "Anonymous");
        assert_eq!(blank.as_str(), "Anonymous");
        assert_eq!(named.as_str(), "alice");
    }
}
