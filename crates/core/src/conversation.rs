use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::GREETING;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry of the append-only chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ConversationMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into(), timestamp: Some(Utc::now()) }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into(), timestamp: Some(Utc::now()) }
    }

    /// Opening message of every session. Carries no timestamp.
    #[must_use]
    pub fn greeting() -> Self {
        Self { role: MessageRole::Assistant, content: GREETING.to_owned(), timestamp: None }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A logged interaction from the `history_chat` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub request: String,
    pub response: String,
    pub sql_script: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Replays the entry as the user turn followed by the assistant turn.
    #[must_use]
    pub fn into_messages(self) -> [ConversationMessage; 2] {
        [
            ConversationMessage {
                role: MessageRole::User,
                content: self.request,
                timestamp: Some(self.created_at),
            },
            ConversationMessage {
                role: MessageRole::Assistant,
                content: self.response,
                timestamp: Some(self.created_at),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_replays_user_then_assistant() {
        let at = Utc::now();
        let entry = HistoryEntry {
            request: "tambah barang".to_owned(),
            response: "Barang ditambahkan".to_owned(),
            sql_script: None,
            created_at: at,
        };
        let [user, bot] = entry.into_messages();
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "tambah barang");
        assert_eq!(bot.role, MessageRole::Assistant);
        assert_eq!(bot.timestamp, Some(at));
    }

    #[test]
    fn test_greeting_has_no_timestamp() {
        let greeting = ConversationMessage::greeting();
        assert_eq!(greeting.content, GREETING);
        assert!(greeting.timestamp.is_none());
        let json = serde_json::to_value(&greeting).unwrap();
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["role"], "assistant");
    }
}
