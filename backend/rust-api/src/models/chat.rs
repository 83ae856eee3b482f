use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Time-ordered UUIDv7, unique per message.
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuickAction {
    pub label: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ChatSessionView {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub composing: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    #[serde(flatten)]
    pub session: ChatSessionView,
    pub quick_actions: Vec<QuickAction>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// `None` when the trimmed input was empty and nothing was appended.
    pub message: Option<ChatMessage>,
    pub composing: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatEvent {
    ChatMessage(ChatMessage),
    Composing { composing: bool },
}

impl ChatEvent {
    pub fn to_sse_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ChatEvent::ChatMessage(_) => "chat-message",
            ChatEvent::Composing { .. } => "composing",
        }
    }
}
