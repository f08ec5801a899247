//! Configuration for the tutor service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tutor backend and call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Fail-fast deadline for a single call (ms)
    pub request_timeout_ms: u64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Substitute canned text when the model is unavailable
    pub fallbacks_enabled: bool,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "API_KEY".to_string(),
            request_timeout_ms: 5_000,
            max_tokens: 512,
            temperature: 0.7,
            fallbacks_enabled: true,
        }
    }
}

impl TutorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TutorConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.fallbacks_enabled);
        assert_eq!(config.api_key_env, "API_KEY");
    }

    #[test]
    fn test_missing_key_env() {
        let config = TutorConfig {
            api_key_env: "MAILCRAFT_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
