//! Request and response types for the Anthropic Messages API.
//!
//! These mirror the documented `/v1/messages` wire format. Responses are
//! parsed into named structs; a response missing required fields fails
//! with an invalid-response error rather than defaulting silently.

use serde::{Deserialize, Serialize};

/// A single input message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMessage {
    /// "user" or "assistant".
    pub role: String,

    /// Plain-text content of the message.
    pub content: String,
}

impl InputMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A Messages API request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model id (e.g. "claude-3-5-sonnet-20241022").
    pub model: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Optional system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Conversation messages.
    pub messages: Vec<InputMessage>,
}

impl MessagesRequest {
    /// Create a request with a model and output budget and no messages.
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system: None,
            messages: Vec::new(),
        }
    }

    /// Append a user message.
    pub fn with_user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(InputMessage::user(content));
        self
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// One block of the response content array.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentBlock {
    /// Block type; text blocks carry "text".
    #[serde(rename = "type")]
    pub kind: String,

    /// Text payload, empty for non-text blocks.
    #[serde(default)]
    pub text: String,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Usage {
    /// Tokens in the prompt.
    pub input_tokens: u32,

    /// Tokens generated.
    pub output_tokens: u32,
}

/// A Messages API response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagesResponse {
    /// Completion id.
    pub id: String,

    /// Response content blocks.
    pub content: Vec<ContentBlock>,

    /// Model that produced the response.
    pub model: String,

    /// Why generation stopped ("end_turn", "max_tokens", ...).
    pub stop_reason: Option<String>,

    /// Token usage, when the API reports it.
    pub usage: Option<Usage>,
}

impl MessagesResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect()
    }
}
