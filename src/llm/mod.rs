//! Chat-completion clients.
//!
//! The agent talks to the language model through [`CompletionClient`], so
//! the HTTP client can be swapped for a scripted one in tests.

mod openai;

pub use openai::{parse_completion, OpenAiClient};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("OpenAI API request failed: {0}")]
    Transport(String),

    #[error("OpenAI API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed OpenAI API response: {0}")]
    MalformedResponse(String),

    #[error("OpenAI API returned no completion")]
    EmptyResponse,
}

/// Something that turns a message list into completion text.
pub trait CompletionClient {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
