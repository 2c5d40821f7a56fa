//! Blocking client for an OpenAI-compatible `/chat/completions` endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{ChatMessage, CompletionClient, LlmError};
use crate::config::LlmSettings;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiClient {
    agent: ureq::Agent,
    settings: LlmSettings,
}

impl OpenAiClient {
    pub fn new(settings: LlmSettings) -> Self {
        let agent = ureq::AgentBuilder::new().build();
        Self { agent, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

impl CompletionClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        debug!(model = %self.settings.model, messages = messages.len(), "sending completion request");

        let response = self
            .agent
            .post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", self.settings.api_key))
            .set("Content-Type", "application/json")
            .send_json(&request);

        match response {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| LlmError::Transport(e.to_string()))?;
                parse_completion(&body)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                error!(status, "completion request rejected");
                Err(LlmError::Api { status, body })
            }
            Err(ureq::Error::Transport(transport)) => Err(LlmError::Transport(transport.to_string())),
        }
    }
}

/// Extract the first choice's message content from a response body.
pub fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::EmptyResponse)
}
