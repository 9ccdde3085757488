//! Chat message, chat profile, and turn reply types for Dnya.
//!
//! Messages form an append-only log between a user and the assistant.
//! The assistant is the fixed identity [`ASSISTANT_ID`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known sender/receiver identity of the assistant.
pub const ASSISTANT_ID: &str = "dnya";

/// A single stored chat message.
///
/// Immutable once written. Within a {user, assistant} pair, messages are
/// ordered by `timestamp` with ties broken by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A message written by `user_id` to the assistant.
    pub fn from_user(user_id: &str, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender_id: user_id.to_string(),
            receiver_id: ASSISTANT_ID.to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// An assistant reply to `user_id`.
    pub fn from_assistant(user_id: &str, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender_id: ASSISTANT_ID.to_string(),
            receiver_id: user_id.to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build an assistant reply that never sorts before the message it answers.
    pub fn reply_to(prompt: &Message, content: impl Into<String>) -> Self {
        let mut reply = Self::from_assistant(&prompt.sender_id, content);
        if reply.timestamp < prompt.timestamp {
            reply.timestamp = prompt.timestamp;
        }
        reply
    }

    pub fn is_from_assistant(&self) -> bool {
        self.sender_id == ASSISTANT_ID
    }
}

/// Chat profile and consent record for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub user_id: String,
    pub has_consented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatUser {
    pub fn new(user_id: &str, email: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            has_consented: false,
            email,
            created_at: Utc::now(),
        }
    }
}

/// Result of one successful conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub reply: String,
    pub user_id: String,
    /// True when the reply came from the fallback completion path.
    pub degraded: bool,
}
