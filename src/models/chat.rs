//! Conversation messages exchanged with the nutrition assistant.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ChatRole {
    User,
    Assistant,
    /// Any role the model does not understand (e.g. "system"); dropped before sending.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Whether the message is a user or assistant turn the model receives.
    pub fn is_conversational(&self) -> bool {
        self.role != ChatRole::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_deserializes_as_other() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "system", "content": "hi"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Other);

        let msg: ChatMessage = serde_json::from_str(r#"{"role": "assistant"}"#).unwrap();
        assert_eq!(msg, ChatMessage::assistant(""));
    }

    #[test]
    fn test_only_user_and_assistant_are_conversational() {
        assert!(ChatMessage::user("hi").is_conversational());
        assert!(ChatMessage::assistant("hello").is_conversational());

        let system: ChatMessage =
            serde_json::from_str(r#"{"role": "system", "content": "be terse"}"#).unwrap();
        assert!(!system.is_conversational());
    }
}
