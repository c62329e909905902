//! Conversation message types.
//!
//! A conversation is an ordered list of [`Message`]s. The system message is
//! never persisted; it is re-synthesized from the agent profile every time a
//! conversation is fed to the chat gateway.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One part of a multimodal message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
}

/// A single message in a conversation.
///
/// `parts` is only populated for one-shot multimodal requests (data analysis).
/// Stored conversations are plain text and omit it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ContentPart>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(MessageRole::Assistant, content)
    }

    /// A multimodal user message made of ordered content parts.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            content: String::new(),
            parts,
        }
    }

    fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            parts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("tool".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_plain_message_omits_parts() {
        let json = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn test_stored_message_without_parts_deserializes() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"Hi there"}"#).unwrap();
        assert_eq!(msg, Message::assistant("Hi there"));
    }

    #[test]
    fn test_content_part_tagging() {
        let part = ContentPart::ImageUrl {
            url: "https://example.com/chart.png".to_string(),
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["url"], "https://example.com/chart.png");
    }
}
