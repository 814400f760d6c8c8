//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Request for one conversation turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The visitor's message
    pub message: String,

    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<HistoryMessage>,

    /// Conversation identifier; minted server-side when absent
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// One prior turn as the UI stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: HistoryRole,
    pub content: String,
}

/// The UI only replays visitor and avatar turns; tool traffic stays
/// internal to a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// Response for one conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// The avatar's final textual answer
    pub reply: String,

    /// Conversation identifier to send back with the next turn
    pub conversation_id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Convert UI history into the wire message list.
pub(crate) fn to_chat_messages(history: &[HistoryMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|m| match m.role {
            HistoryRole::User => ChatMessage::user(m.content.clone()),
            HistoryRole::Assistant => ChatMessage::assistant(m.content.clone()),
        })
        .collect()
}
