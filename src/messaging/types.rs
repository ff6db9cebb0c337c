//! Core types for conversations and messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::store::Document;

/// A two-party conversation.
///
/// Members are stored as the canonical sorted pair, so lookups for
/// `{a, b}` and `{b, a}` find the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation id, derived from the canonical pair.
    #[serde(skip)]
    pub id: String,
    /// The two member ids, sorted.
    pub members: Vec<String>,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

impl Conversation {
    /// Returns whether the given user is a member.
    #[must_use]
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Returns the member other than `user_id`, if `user_id` is a member.
    #[must_use]
    pub fn other_member(&self, user_id: &str) -> Option<&str> {
        if !self.is_member(user_id) {
            return None;
        }
        self.members
            .iter()
            .map(String::as_str)
            .find(|m| *m != user_id)
    }

    pub(crate) fn to_document(&self) -> Result<Document> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Store(format!("Failed to encode conversation: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(CoreError::Store(
                "Conversation did not encode to an object".to_string(),
            ));
        };
        Ok(fields)
    }

    pub(crate) fn from_document(id: &str, fields: Document) -> Result<Self> {
        let mut conversation: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|e| CoreError::Store(format!("Malformed conversation: {e}")))?;
        conversation.id = id.to_string();
        Ok(conversation)
    }
}

/// A single message in a conversation's append-only log.
///
/// Immutable after creation except for the optional read marker. The
/// recipient is implicit: the conversation's other member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    #[serde(skip)]
    pub id: String,
    /// The owning conversation.
    pub conversation_id: String,
    /// Who sent it.
    pub sender_id: String,
    /// Message body.
    pub content: String,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
    /// When the other member read it, if they have.
    #[serde(default)]
    pub read_at: Option<i64>,
}

impl Message {
    pub(crate) fn to_document(&self) -> Result<Document> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Store(format!("Failed to encode message: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(CoreError::Store(
                "Message did not encode to an object".to_string(),
            ));
        };
        Ok(fields)
    }

    pub(crate) fn from_document(id: &str, fields: Document) -> Result<Self> {
        let mut message: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|e| CoreError::Store(format!("Malformed message: {e}")))?;
        message.id = id.to_string();
        Ok(message)
    }
}

/// A conversation as listed per member, annotated with its most recent
/// message (or `None` for an empty log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    /// The conversation.
    pub conversation: Conversation,
    /// The single most recent message, if any.
    pub latest_message: Option<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation {
            id: "c1".to_string(),
            members: vec!["alice".to_string(), "bob".to_string()],
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn membership_checks() {
        let c = conversation();
        assert!(c.is_member("alice"));
        assert!(c.is_member("bob"));
        assert!(!c.is_member("carol"));
    }

    #[test]
    fn other_member_resolution() {
        let c = conversation();
        assert_eq!(c.other_member("alice"), Some("bob"));
        assert_eq!(c.other_member("bob"), Some("alice"));
        assert_eq!(c.other_member("carol"), None);
    }

    #[test]
    fn conversation_document_roundtrip() {
        let c = conversation();
        let doc = c.to_document().unwrap();
        assert!(!doc.contains_key("id"));

        let recovered = Conversation::from_document("c1", doc).unwrap();
        assert_eq!(recovered, c);
    }

    #[test]
    fn message_document_roundtrip() {
        let message = Message {
            id: "m1".to_string(),
            conversation_id: "c1".to_string(),
            sender_id: "alice".to_string(),
            content: "rehearsal at 8?".to_string(),
            created_at: 1_700_000_000_000,
            read_at: None,
        };

        let doc = message.to_document().unwrap();
        assert_eq!(doc["read_at"], Value::Null);

        let recovered = Message::from_document("m1", doc).unwrap();
        assert_eq!(recovered, message);
    }

    #[test]
    fn message_with_read_marker_roundtrips() {
        let message = Message {
            id: "m1".to_string(),
            conversation_id: "c1".to_string(),
            sender_id: "alice".to_string(),
            content: "hi".to_string(),
            created_at: 1_700_000_000_000,
            read_at: Some(1_700_000_060_000),
        };

        let doc = message.to_document().unwrap();
        let recovered = Message::from_document("m1", doc).unwrap();
        assert_eq!(recovered.read_at, Some(1_700_000_060_000));
    }
}
