//! Tagged result of a tutor call.

use serde::{Deserialize, Serialize};

/// Why a tutor call did not produce generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// No backend configured (no credentials)
    NotConfigured,
    /// Backend answered but the content was empty or malformed
    UnusableResponse,
    /// Backend failed or timed out
    BackendError(String),
}

/// Result of a tutor call.
///
/// Every call site has to handle all three cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum TutorOutcome<T> {
    /// Content produced by the model
    Generated(T),
    /// Canned content standing in for the model
    Fallback { content: T, reason: DegradedReason },
    /// Nothing to show; fallbacks are disabled
    Failed(DegradedReason),
}

impl<T> TutorOutcome<T> {
    /// Content if there is any, generated or canned.
    pub fn content(&self) -> Option<&T> {
        match self {
            TutorOutcome::Generated(content) | TutorOutcome::Fallback { content, .. } => {
                Some(content)
            }
            TutorOutcome::Failed(_) => None,
        }
    }

    pub fn into_content(self) -> Option<T> {
        match self {
            TutorOutcome::Generated(content) | TutorOutcome::Fallback { content, .. } => {
                Some(content)
            }
            TutorOutcome::Failed(_) => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, TutorOutcome::Generated(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TutorOutcome::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_access() {
        let generated = TutorOutcome::Generated("hi".to_string());
        assert_eq!(generated.content().map(String::as_str), Some("hi"));
        assert!(generated.is_generated());

        let fallback = TutorOutcome::Fallback {
            content: "canned".to_string(),
            reason: DegradedReason::NotConfigured,
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.into_content(), Some("canned".to_string()));

        let failed: TutorOutcome<String> = TutorOutcome::Failed(DegradedReason::UnusableResponse);
        assert!(failed.content().is_none());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = TutorOutcome::Fallback {
            content: "x".to_string(),
            reason: DegradedReason::BackendError("boom".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["data"]["reason"]["backend_error"], "boom");
    }
}
