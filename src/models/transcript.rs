//! Transcript messages — immutable once received, consumed only for display.

use serde::{Deserialize, Serialize};

use super::enums::{MessageKind, MessageRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: MessageRole,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: String,
}

impl TranscriptMessage {
    pub fn new(role: MessageRole, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            role,
            kind,
            content: content.into(),
            timestamp: String::new(),
        }
    }
}
