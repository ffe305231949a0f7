//! Request body types (Deserialize)

use serde::Deserialize;
use uuid::Uuid;

/// Longest accepted chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("text must not be empty".to_owned());
        }
        let len = self.text.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(format!("text exceeds {MAX_MESSAGE_CHARS} characters (got {len})"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub action_id: Uuid,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_message_rejects_blank_text() {
        let req: SendMessageRequest =
            serde_json::from_value(json!({"text": "  \n"})).expect("valid SendMessageRequest");
        let err = req.validate().unwrap_err();
        assert!(err.contains("empty"), "Expected 'empty' in error: {err}");
    }

    #[test]
    fn test_send_message_rejects_oversized_text() {
        let req = SendMessageRequest { text: "x".repeat(MAX_MESSAGE_CHARS + 1) };
        let err = req.validate().unwrap_err();
        assert!(err.contains("4000"), "Expected '4000' in error: {err}");
    }

    #[test]
    fn test_confirm_requires_uuid() {
        assert!(serde_json::from_value::<ConfirmRequest>(json!({"action_id": "nope"})).is_err());
        let id = Uuid::new_v4();
        let req: ConfirmRequest = serde_json::from_value(json!({"action_id": id})).unwrap();
        assert_eq!(req.action_id, id);
    }
}
