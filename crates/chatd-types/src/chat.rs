//! Chat resource types.
//!
//! A chat is a conversation container. Its identifier and creation timestamp
//! are assigned by the store on insert; the transcript (`messages`) is only
//! attached when a chat is fetched together with its messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidId, parse_id};
use crate::message::Message;

/// Store-assigned chat identifier.
///
/// Backed by an integer primary key but carried as a string on the wire
/// (`"id": "1"`), which is also the form it takes in URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_id(s)?))
    }
}

impl TryFrom<String> for ChatId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChatId> for String {
    fn from(id: ChatId) -> Self {
        id.to_string()
    }
}

/// A persisted chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Transcript, present only when the chat was loaded with its messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

impl Chat {
    /// Attach a transcript to this chat.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }
}

/// Input for creating a chat. Everything else is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChat {
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_chat() -> Chat {
        Chat {
            id: ChatId(1),
            title: Some("testChat".to_string()),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            messages: None,
        }
    }

    #[test]
    fn test_chat_id_parses_from_path_segment() {
        assert_eq!("42".parse::<ChatId>().unwrap(), ChatId(42));
        assert!("abc".parse::<ChatId>().is_err());
        assert!("".parse::<ChatId>().is_err());
        assert!(" 1".parse::<ChatId>().is_err());
        assert!("+1".parse::<ChatId>().is_err());
    }

    #[test]
    fn test_chat_serializes_id_as_string_and_omits_missing_transcript() {
        let json = serde_json::to_value(sample_chat()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "title": "testChat",
                "created_at": "2020-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_chat_with_messages_serializes_empty_transcript() {
        let json = serde_json::to_value(sample_chat().with_messages(Vec::new())).unwrap();
        assert_eq!(json["messages"], serde_json::json!([]));
    }

    #[test]
    fn test_chat_id_rejects_non_numeric_json() {
        let result: Result<ChatId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
