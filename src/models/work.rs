//! Pre-authentication work: chat messages and the virtual filesystem snapshot

use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }
}

/// Virtual filesystem snapshot, mapping path to file contents
///
/// Opaque to this core; it is carried from the anonymous tracker into a
/// created project without inspection.
pub type FileSystemSnapshot = serde_json::Map<String, serde_json::Value>;

/// Work recorded before the user authenticated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonWork {
    pub messages: Vec<ChatMessage>,
    pub file_system_data: FileSystemSnapshot,
}

impl AnonWork {
    /// Whether this snapshot is worth promoting into a project
    ///
    /// Only message-bearing sessions are reconciled; file data alone does
    /// not qualify.
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}
