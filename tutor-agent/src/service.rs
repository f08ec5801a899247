//! TutorService - main entry point for tutor feedback.
//!
//! Wraps the LLM backends with a fail-fast deadline and maps every failure
//! to canned content, so a lesson stage waiting on the tutor always gets
//! an answer.

use std::sync::Arc;
use tracing::{debug, info, warn};

use lesson::MysteryReply;

use crate::backend::traits::{CompletionRequest, CompletionResponse, LlmBackend, LlmError};
use crate::backend::OpenAiBackend;
use crate::config::TutorConfig;
use crate::outcome::{DegradedReason, TutorOutcome};
use crate::prompt::{self, TutorTask};

/// Error types for the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No backend configured at all
    #[error("No LLM backend configured")]
    NotConfigured,

    /// Backends configured but none answered the availability check
    #[error("No LLM backend available")]
    NoBackendAvailable,

    /// Backend error
    #[error("Backend error: {0}")]
    BackendError(#[from] LlmError),
}

impl ServiceError {
    fn degraded_reason(&self) -> DegradedReason {
        match self {
            ServiceError::NotConfigured => DegradedReason::NotConfigured,
            other => DegradedReason::BackendError(other.to_string()),
        }
    }
}

/// The AI tutor.
pub struct TutorService {
    /// Configuration
    config: TutorConfig,
    /// Available LLM backends, in preference order
    backends: Vec<Arc<dyn LlmBackend>>,
}

impl TutorService {
    /// Create a new service with the given backends.
    pub fn new(backends: Vec<Arc<dyn LlmBackend>>) -> Self {
        Self {
            config: TutorConfig::default(),
            backends,
        }
    }

    /// Service with no backend. Every call answers with fallback content.
    pub fn offline(config: TutorConfig) -> Self {
        Self::new(Vec::new()).with_config(config)
    }

    /// Build from configuration.
    ///
    /// Without an API key the service runs offline, which is not an error.
    pub fn from_config(config: TutorConfig) -> Self {
        let Some(api_key) = config.api_key() else {
            warn!(
                env = %config.api_key_env,
                "API key not found, tutor will use canned feedback"
            );
            return Self::offline(config);
        };

        match OpenAiBackend::new(&config.base_url, &config.model, Some(api_key)) {
            Ok(backend) => {
                info!(model = %config.model, "Tutor backend configured");
                Self::new(vec![Arc::new(backend)]).with_config(config)
            }
            Err(e) => {
                warn!(error = %e, "Tutor backend could not be created, running offline");
                Self::offline(config)
            }
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: TutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Whether any backend is configured.
    pub fn is_configured(&self) -> bool {
        !self.backends.is_empty()
    }

    /// Write the reply to the student's first e-mail.
    pub async fn generate_reply(&self, student_name: &str) -> TutorOutcome<MysteryReply> {
        let request = prompt::mystery_reply_request(student_name);

        match self.call(TutorTask::MysteryReply, request).await {
            Ok(response) => match prompt::parse_mystery_reply(&response.content) {
                Some(reply) => TutorOutcome::Generated(reply),
                None => {
                    debug!(content = %response.content, "Unusable mystery reply");
                    self.degrade(
                        prompt::error_reply(student_name),
                        DegradedReason::UnusableResponse,
                    )
                }
            },
            Err(ServiceError::NotConfigured) => self.degrade(
                prompt::offline_reply(student_name),
                DegradedReason::NotConfigured,
            ),
            Err(e) => self.degrade(prompt::error_reply(student_name), e.degraded_reason()),
        }
    }

    /// Evaluate politeness and clarity of a draft.
    pub async fn check_tone(&self, subject: &str, body: &str) -> TutorOutcome<String> {
        let request = prompt::tone_check_request(subject, body);

        match self.call(TutorTask::ToneCheck, request).await {
            Ok(response) => {
                let text = response.content.trim();
                if text.is_empty() {
                    self.degrade(prompt::EMPTY_TONE.to_string(), DegradedReason::UnusableResponse)
                } else {
                    TutorOutcome::Generated(text.to_string())
                }
            }
            Err(ServiceError::NotConfigured) => {
                self.degrade(prompt::OFFLINE_TONE.to_string(), DegradedReason::NotConfigured)
            }
            Err(e) => self.degrade(prompt::ERROR_TONE.to_string(), e.degraded_reason()),
        }
    }

    fn degrade<T>(&self, content: T, reason: DegradedReason) -> TutorOutcome<T> {
        if self.config.fallbacks_enabled {
            TutorOutcome::Fallback { content, reason }
        } else {
            TutorOutcome::Failed(reason)
        }
    }

    /// Run one completion under the configured deadline.
    async fn call(
        &self,
        task: TutorTask,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ServiceError> {
        if self.backends.is_empty() {
            return Err(ServiceError::NotConfigured);
        }

        let request_id = uuid::Uuid::new_v4();
        let request = request
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        debug!(%request_id, task = ?task, "Calling tutor backend");

        let attempt = async {
            let backend = self.select_backend().await?;
            Ok::<_, ServiceError>(backend.complete(request).await?)
        };

        match tokio::time::timeout(self.config.request_timeout(), attempt).await {
            Ok(Ok(response)) => {
                debug!(
                    %request_id,
                    tokens = response.usage.total(),
                    "Tutor backend answered"
                );
                Ok(response)
            }
            Ok(Err(e)) => {
                warn!(%request_id, task = ?task, error = %e, "Tutor call failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    %request_id,
                    task = ?task,
                    timeout_ms = self.config.request_timeout_ms,
                    "Tutor call timed out"
                );
                Err(LlmError::Timeout(self.config.request_timeout_ms).into())
            }
        }
    }

    /// Select the first available backend.
    async fn select_backend(&self) -> Result<Arc<dyn LlmBackend>, ServiceError> {
        for backend in &self.backends {
            if backend.is_available().await {
                return Ok(Arc::clone(backend));
            }
        }
        Err(ServiceError::NoBackendAvailable)
    }
}
