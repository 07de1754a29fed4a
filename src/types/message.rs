//! Chat-completion request types sent upstream.

use serde::{Deserialize, Serialize};

/// Role of a message author. Only user turns are ever sent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single message in the upstream conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Body of a chat-completion request.
///
/// Serializes directly into the OpenAI-compatible wire shape:
///
/// ```
/// use yachtsy_mcp::types::ChatRequest;
///
/// let request = ChatRequest::single_prompt("yachtsy-agent", "Tell me about the Tayana 37");
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["model"], "yachtsy-agent");
/// assert_eq!(body["messages"][0]["role"], "user");
/// assert_eq!(body["stream"], true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// A streaming request carrying exactly one user message.
    pub fn single_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            stream: true,
        }
    }
}
