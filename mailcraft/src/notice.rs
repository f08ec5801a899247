//! Notices for the presentation layer.

use serde::Serialize;

use lesson::{FocusHint, MysteryReply, SideEffect, Stage};

/// Something the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Transient message, dismissed after `display_ms`
    Message { text: String, display_ms: u64 },
    /// Mission brief for a stage that just opened
    MissionBrief { stage: Stage },
    /// Recommended presentation focus
    Focus { hint: FocusHint },
    /// Points earned by an action or transition
    Points { gained: u32, total: u32 },
    /// The lesson moved to a new stage
    StageChanged { stage: Stage },
    /// Answer feedback during the quiz
    QuizFeedback { is_correct: bool, correct_option: usize },
    /// The tutor's reply to the first e-mail arrived
    MysteryReply(MysteryReply),
}

impl Notice {
    pub fn message(text: impl Into<String>, display_ms: u64) -> Self {
        Notice::Message {
            text: text.into(),
            display_ms,
        }
    }

    /// Presentation notice for a side effect, if it is one.
    ///
    /// Effects that need work from the session (tutor calls, LMS
    /// reports) have no direct notice.
    pub fn from_side_effect(effect: &SideEffect) -> Option<Self> {
        match effect {
            SideEffect::ShowMissionBrief { stage } => Some(Notice::MissionBrief { stage: *stage }),
            SideEffect::ShowMessage { text, display_ms } => {
                Some(Notice::message(text.clone(), *display_ms))
            }
            SideEffect::Focus { hint } => Some(Notice::Focus { hint: *hint }),
            SideEffect::GenerateMysteryReply { .. }
            | SideEffect::CheckTone { .. }
            | SideEffect::ReportCompletion { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_effects_map_to_notices() {
        assert_eq!(
            Notice::from_side_effect(&SideEffect::Focus { hint: FocusHint::People }),
            Some(Notice::Focus { hint: FocusHint::People })
        );
        assert_eq!(
            Notice::from_side_effect(&SideEffect::ShowMissionBrief { stage: Stage::Basics }),
            Some(Notice::MissionBrief { stage: Stage::Basics })
        );
        assert_eq!(
            Notice::from_side_effect(&SideEffect::CheckTone {
                subject: "Hi".to_string(),
                body: "Hello".to_string(),
            }),
            None
        );
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_value(Notice::Points { gained: 10, total: 60 }).unwrap();
        assert_eq!(json["kind"], "points");
        assert_eq!(json["total"], 60);
    }
}
