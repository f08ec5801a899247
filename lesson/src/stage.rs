//! Lesson stages.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// One strictly ordered phase of the lesson.
///
/// Progression is forward-only. The only way back to [`Stage::Intro`] is a
/// full restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Student enters a name
    #[default]
    Intro,
    /// Fill in recipient, subject and body
    Basics,
    /// Fix the misspelled words
    SpellCheck,
    /// Format text and style an inserted picture
    FormattingImages,
    /// Save contacts
    ContactsManagement,
    /// Use Cc or Bcc
    AdvancedCcBcc,
    /// Five-question quiz
    Quiz,
    /// Printable certificate
    Certificate,
}

impl Stage {
    /// Every stage, in lesson order.
    pub const ALL: [Stage; 8] = [
        Stage::Intro,
        Stage::Basics,
        Stage::SpellCheck,
        Stage::FormattingImages,
        Stage::ContactsManagement,
        Stage::AdvancedCcBcc,
        Stage::Quiz,
        Stage::Certificate,
    ];

    /// Zero-based position in the lesson.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage that follows, if any.
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Whether this is the last stage.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Progress bar fill, 0-100.
    pub fn progress_percent(self) -> u8 {
        let last = (Self::ALL.len() - 1) as f32;
        ((self.index() as f32 / last) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Intro.next(), Some(Stage::Basics));
        assert_eq!(Stage::Quiz.next(), Some(Stage::Certificate));
        assert_eq!(Stage::Certificate.next(), None);
        assert!(Stage::Basics < Stage::Quiz);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(Stage::Intro.progress_percent(), 0);
        assert_eq!(Stage::ContactsManagement.progress_percent(), 57);
        assert_eq!(Stage::Certificate.progress_percent(), 100);
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&Stage::AdvancedCcBcc).unwrap();
        assert_eq!(json, "\"ADVANCED_CC_BCC\"");
    }
}
