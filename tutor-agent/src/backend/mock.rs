//! Mock LLM backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::traits::*;

/// Scripted backend.
///
/// Answers every call with the same canned text, or fails, optionally
/// after a delay. Records what it was asked.
pub struct MockBackend {
    model_id: String,
    available: AtomicBool,
    reply: String,
    failure: Option<LlmError>,
    delay: Option<Duration>,
    calls: AtomicU32,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockBackend {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            available: AtomicBool::new(true),
            reply: "Mock response".to_string(),
            failure: None,
            delay: None,
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.reply = content.into();
        self
    }

    /// Fail every completion with `error`.
    pub fn with_failure(mut self, error: LlmError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Completions started so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> &str {
        &self.model_id
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt_tokens = request.estimated_tokens();
        *self.last_request.lock().await = Some(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(LlmError::Unavailable(format!("{} switched off", self.model_id)));
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(CompletionResponse {
            content: self.reply.clone(),
            truncated: false,
            usage: Usage {
                prompt_tokens,
                completion_tokens: (self.reply.chars().count() / 4) as u32,
            },
        })
    }
}
