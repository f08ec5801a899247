//! Shared types for the lesson crate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::stage::Stage;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Error types for rejected lesson actions.
///
/// None of these are fatal: the action is refused and the state is left as
/// it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LessonError {
    /// Action is not available in the current stage
    #[error("Action not available during {current:?}, expected {expected:?}")]
    WrongStage { current: Stage, expected: Stage },

    /// Correction task ID outside the authored set
    #[error("Unknown correction task: {0}")]
    UnknownCorrectionTask(u8),

    /// Contact ID not present in the book
    #[error("Unknown contact: {0}")]
    UnknownContact(String),

    /// New contact is missing its name or e-mail
    #[error("A new contact needs both a name and an e-mail address")]
    IncompleteContact,

    /// Picture style applied before any picture was inserted
    #[error("Insert a picture before styling it")]
    NoAttachment,

    /// Quiz input received while the feedback display is locked
    #[error("Quiz is showing feedback, input is locked")]
    QuizLocked,

    /// Quiz option index out of range
    #[error("Invalid choice {choice}, question has {options} options")]
    InvalidChoice { choice: usize, options: usize },

    /// Quiz action not valid in the current quiz phase
    #[error("Quiz action not valid now: {0}")]
    QuizPhase(String),

    /// Transition target is not the stage directly after the current one
    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Stage, to: Stage },
}

/// Result type for lesson actions.
pub type Result<T> = std::result::Result<T, LessonError>;

/// Presentation focus the core recommends after an action or a failed check.
///
/// The presentation layer may honour or ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum FocusHint {
    /// Mail composer
    Mail,
    /// Contact book ("people" view)
    People,
    /// Text formatting tools
    FormattingTools,
    /// Insert tools (pictures)
    InsertTools,
    /// Picture formatting tools
    PictureTools,
}

/// Completion status reported to the host LMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
    Passed,
    Failed,
    Incomplete,
}

/// Reply the tutor "sends back" after the first e-mail.
///
/// Display-only; never part of any stage gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MysteryReply {
    pub subject: String,
    pub body: String,
}

impl MysteryReply {
    /// Create a reply.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Display and feedback timings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct Timing {
    /// How long a remediation message stays up
    pub remediation_ms: u64,
    /// Longer display for the two-part formatting hints
    pub extended_remediation_ms: u64,
    /// How long the tone-check feedback is shown before the quiz opens
    pub tone_feedback_ms: u64,
    /// Locked feedback window after a quiz answer
    pub quiz_feedback_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            remediation_ms: 3000,
            extended_remediation_ms: 4000,
            tone_feedback_ms: 4000,
            quiz_feedback_ms: 1500,
        }
    }
}

impl Timing {
    /// All delays zero. Useful for scripted runs and tests.
    pub fn instant() -> Self {
        Self {
            remediation_ms: 0,
            extended_remediation_ms: 0,
            tone_feedback_ms: 0,
            quiz_feedback_ms: 0,
        }
    }

    pub fn tone_feedback(&self) -> Duration {
        Duration::from_millis(self.tone_feedback_ms)
    }

    pub fn quiz_feedback(&self) -> Duration {
        Duration::from_millis(self.quiz_feedback_ms)
    }
}
