//! Conversation context handed to the provider alongside a prompt.
//!
//! Callers own the size policy: [`trim_context`] caps every turn before the
//! gateway sees it.

use serde::{Deserialize, Serialize};

/// Default per-turn character cap.
pub const DEFAULT_TURN_CHAR_LIMIT: usize = 4_000;

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
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
}

/// Copy `turns`, keeping at most `max_chars` characters of each turn.
/// Truncation happens on a character boundary.
pub fn trim_context(turns: &[ChatMessage], max_chars: usize) -> Vec<ChatMessage> {
    turns
        .iter()
        .map(|turn| ChatMessage {
            role: turn.role,
            content: truncate_chars(&turn.content, max_chars),
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
