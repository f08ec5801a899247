//! Core traits for LLM backends.
//!
//! The tutor talks to text generation through [`LlmBackend`], so the
//! OpenAI-compatible HTTP client and the test mock are interchangeable.
//! Tutor calls are single-turn: one instruction block, one prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error types for LLM operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body was not what the backend promised
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),
}

/// A text generation backend.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Backend identifier, usually the model name
    fn id(&self) -> &str;

    async fn is_available(&self) -> bool;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Shape of the expected answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyFormat {
    #[default]
    Text,
    /// A single JSON object
    JsonObject,
}

/// One single-turn completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Standing instructions (the system role)
    pub instructions: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    /// 0.0 to 2.0
    pub temperature: Option<f32>,
    pub format: ReplyFormat,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set temperature, clamped to the accepted range.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }

    pub fn expecting_json(mut self) -> Self {
        self.format = ReplyFormat::JsonObject;
        self
    }

    pub fn expects_json(&self) -> bool {
        self.format == ReplyFormat::JsonObject
    }

    /// Rough token estimate, four characters per token.
    pub fn estimated_tokens(&self) -> u32 {
        let chars = self.prompt.chars().count()
            + self.instructions.as_deref().map_or(0, |i| i.chars().count());
        (chars / 4) as u32
    }
}

/// Generated text and its accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    /// Generation stopped at the token limit or a content filter
    pub truncated: bool,
    pub usage: Usage,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("Hi")
            .with_instructions("Be kind")
            .with_temperature(3.5)
            .with_max_tokens(200)
            .expecting_json();

        assert_eq!(request.prompt, "Hi");
        assert_eq!(request.temperature, Some(2.0));
        assert_eq!(request.max_tokens, Some(200));
        assert!(request.expects_json());
    }

    #[test]
    fn test_estimated_tokens_counts_characters() {
        let request = CompletionRequest::new("مرحبا بك").with_instructions("abcd");
        assert_eq!(request.estimated_tokens(), 3);
    }
}
