//! Stage progression engine.
//!
//! Evaluates the completion predicate of the current stage against the
//! lesson state and says what should happen next. The engine never mutates
//! state and never performs side effects itself.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::contacts::ContactBook;
use crate::corrections::CorrectionTaskSet;
use crate::document::EmailDocument;
use crate::quiz::Quiz;
use crate::score::stage_bonus;
use crate::script;
use crate::stage::Stage;
use crate::types::{CompletionStatus, FocusHint, Timing};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Contacts needed to pass the contacts stage.
///
/// The seed book already holds this many, so the gate opens without any
/// student action.
pub const MIN_CONTACTS: usize = 2;

/// Maximum score reported to the LMS.
pub const LMS_MAX_SCORE: u32 = 100;

/// Borrowed view of everything the predicates read.
#[derive(Debug, Clone, Copy)]
pub struct LessonView<'a> {
    pub student_name: &'a str,
    pub document: &'a EmailDocument,
    pub contacts: &'a ContactBook,
    pub corrections: &'a CorrectionTaskSet,
    pub quiz: &'a Quiz,
    /// Score before this transition
    pub score: u32,
}

/// Transient guidance shown when a check fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Remediation {
    pub message: String,
    /// Auto-dismiss delay
    pub display_ms: u64,
    /// Where the student should look next
    pub focus: Option<FocusHint>,
}

/// Work the session layer must carry out for a transition or action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SideEffect {
    /// Open the mission brief of the new stage
    ShowMissionBrief { stage: Stage },
    /// Show a transient message
    ShowMessage { text: String, display_ms: u64 },
    /// Recommend a presentation focus
    Focus { hint: FocusHint },
    /// Fire-and-forget mystery reply generation
    GenerateMysteryReply { student_name: String },
    /// Tone check that must finish before the transition is committed
    CheckTone { subject: String, body: String },
    /// Report the final result to the LMS
    ReportCompletion {
        status: CompletionStatus,
        raw: u32,
        max: u32,
        min: u32,
    },
}

/// Outcome of a stage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceResult {
    Advanced {
        next_stage: Stage,
        score_delta: u32,
        side_effects: Vec<SideEffect>,
    },
    Held {
        remediation: Remediation,
    },
}

impl AdvanceResult {
    pub fn is_advanced(&self) -> bool {
        matches!(self, AdvanceResult::Advanced { .. })
    }
}

/// The lesson's state machine.
#[derive(Debug, Clone, Default)]
pub struct StageEngine {
    timing: Timing,
}

impl StageEngine {
    pub fn new(timing: Timing) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Check the objective of `stage` and describe the transition.
    pub fn advance(&self, stage: Stage, view: LessonView<'_>) -> AdvanceResult {
        let result = match stage {
            Stage::Intro => self.check_intro(view),
            Stage::Basics => self.check_basics(view),
            Stage::SpellCheck => self.check_spelling(view),
            Stage::FormattingImages => self.check_formatting(view),
            Stage::ContactsManagement => self.check_contacts(view),
            Stage::AdvancedCcBcc => self.check_copy_recipients(view),
            Stage::Quiz => self.check_quiz(view),
            Stage::Certificate => self.hold(script::LESSON_COMPLETE, None),
        };

        debug!(stage = ?stage, advanced = result.is_advanced(), "Stage checked");
        result
    }

    fn check_intro(&self, view: LessonView<'_>) -> AdvanceResult {
        if view.student_name.trim().is_empty() {
            return self.hold(script::NEED_NAME, None);
        }
        self.advance_to(Stage::Intro, vec![brief(Stage::Basics)])
    }

    fn check_basics(&self, view: LessonView<'_>) -> AdvanceResult {
        if !view.document.has_basics() {
            return self.hold(script::NEED_BASICS, None);
        }

        let name = view.student_name.trim();
        let student_name = if name.is_empty() {
            script::DEFAULT_REPLY_NAME
        } else {
            name
        };

        self.advance_to(
            Stage::Basics,
            vec![
                SideEffect::GenerateMysteryReply {
                    student_name: student_name.to_string(),
                },
                brief(Stage::SpellCheck),
            ],
        )
    }

    fn check_spelling(&self, view: LessonView<'_>) -> AdvanceResult {
        if !view.corrections.all_fixed() {
            return self.hold(script::NEED_SPELLING, None);
        }
        self.advance_to(Stage::SpellCheck, vec![brief(Stage::FormattingImages)])
    }

    fn check_formatting(&self, view: LessonView<'_>) -> AdvanceResult {
        let doc = view.document;
        let text = doc.has_text_formatting();
        let image = doc.has_image_formatting();

        match (text, image) {
            (true, true) => self.advance_to(
                Stage::FormattingImages,
                vec![
                    brief(Stage::ContactsManagement),
                    SideEffect::Focus { hint: FocusHint::People },
                ],
            ),
            (false, true) => self.hold_extended(script::NEED_TEXT_FORMAT, FocusHint::FormattingTools),
            (true, false) => {
                // Picture present but unstyled: point at the picture tools instead
                let hint = if doc.has_attachment() {
                    FocusHint::PictureTools
                } else {
                    FocusHint::InsertTools
                };
                self.hold_extended(script::NEED_IMAGE_FORMAT, hint)
            }
            (false, false) => self.hold(script::NEED_BOTH_FORMATS, None),
        }
    }

    fn check_contacts(&self, view: LessonView<'_>) -> AdvanceResult {
        if view.contacts.len() < MIN_CONTACTS {
            return self.hold(script::NEED_CONTACT, Some(FocusHint::People));
        }
        if view.contacts.added_count() == 0 {
            warn!(
                contacts = view.contacts.len(),
                threshold = MIN_CONTACTS,
                "Contacts stage passed with seed contacts only"
            );
        }
        self.advance_to(
            Stage::ContactsManagement,
            vec![
                brief(Stage::AdvancedCcBcc),
                SideEffect::Focus { hint: FocusHint::Mail },
            ],
        )
    }

    fn check_copy_recipients(&self, view: LessonView<'_>) -> AdvanceResult {
        if !view.document.uses_copy_recipients() {
            return self.hold(script::NEED_CC_BCC, None);
        }
        // No mission brief for the quiz
        self.advance_to(
            Stage::AdvancedCcBcc,
            vec![SideEffect::CheckTone {
                subject: view.document.subject().to_string(),
                body: view.document.body().to_string(),
            }],
        )
    }

    fn check_quiz(&self, view: LessonView<'_>) -> AdvanceResult {
        if !view.quiz.is_claimed() {
            return self.hold(script::NEED_QUIZ, None);
        }

        // Reported score is clipped to the LMS maximum
        let raw = view
            .score
            .saturating_add(stage_bonus(Stage::Quiz))
            .min(LMS_MAX_SCORE);

        self.advance_to(
            Stage::Quiz,
            vec![SideEffect::ReportCompletion {
                status: CompletionStatus::Passed,
                raw,
                max: LMS_MAX_SCORE,
                min: 0,
            }],
        )
    }

    fn advance_to(&self, from: Stage, side_effects: Vec<SideEffect>) -> AdvanceResult {
        match from.next() {
            Some(next_stage) => AdvanceResult::Advanced {
                next_stage,
                score_delta: stage_bonus(from),
                side_effects,
            },
            None => self.hold(script::LESSON_COMPLETE, None),
        }
    }

    fn hold(&self, message: &str, focus: Option<FocusHint>) -> AdvanceResult {
        AdvanceResult::Held {
            remediation: Remediation {
                message: message.to_string(),
                display_ms: self.timing.remediation_ms,
                focus,
            },
        }
    }

    fn hold_extended(&self, message: &str, focus: FocusHint) -> AdvanceResult {
        AdvanceResult::Held {
            remediation: Remediation {
                message: message.to_string(),
                display_ms: self.timing.extended_remediation_ms,
                focus: Some(focus),
            },
        }
    }
}

fn brief(stage: Stage) -> SideEffect {
    SideEffect::ShowMissionBrief { stage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EmailField, ImageStyle, TextStyle};

    struct Fixture {
        name: String,
        document: EmailDocument,
        contacts: ContactBook,
        corrections: CorrectionTaskSet,
        quiz: Quiz,
        score: u32,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                name: String::new(),
                document: EmailDocument::new(),
                contacts: ContactBook::seeded(),
                corrections: CorrectionTaskSet::authored(),
                quiz: Quiz::authored(),
                score: 0,
            }
        }

        fn view(&self) -> LessonView<'_> {
            LessonView {
                student_name: &self.name,
                document: &self.document,
                contacts: &self.contacts,
                corrections: &self.corrections,
                quiz: &self.quiz,
                score: self.score,
            }
        }
    }

    fn held_message(result: AdvanceResult) -> Remediation {
        match result {
            AdvanceResult::Held { remediation } => remediation,
            other => panic!("expected Held, got {:?}", other),
        }
    }

    #[test]
    fn test_intro_requires_name() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.name = "   ".to_string();
        assert!(!engine.advance(Stage::Intro, fx.view()).is_advanced());

        fx.name = "Layla".to_string();
        match engine.advance(Stage::Intro, fx.view()) {
            AdvanceResult::Advanced { next_stage, score_delta, side_effects } => {
                assert_eq!(next_stage, Stage::Basics);
                assert_eq!(score_delta, 0);
                assert_eq!(side_effects, vec![brief(Stage::Basics)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_basics_triggers_mystery_reply() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.name = "Layla".to_string();
        fx.document.set_field(EmailField::To, "a@b.com");
        fx.document.set_field(EmailField::Subject, "Hi");

        let remediation = held_message(engine.advance(Stage::Basics, fx.view()));
        assert_eq!(remediation.message, script::NEED_BASICS);
        assert_eq!(remediation.display_ms, 3000);

        fx.document.set_field(EmailField::Body, "Hello");
        match engine.advance(Stage::Basics, fx.view()) {
            AdvanceResult::Advanced { next_stage, score_delta, side_effects } => {
                assert_eq!(next_stage, Stage::SpellCheck);
                assert_eq!(score_delta, 50);
                assert!(side_effects.contains(&SideEffect::GenerateMysteryReply {
                    student_name: "Layla".to_string()
                }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_spelling_needs_all_nine() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        for id in 1..=8 {
            fx.corrections.mark_fixed(id).unwrap();
        }
        assert!(!engine.advance(Stage::SpellCheck, fx.view()).is_advanced());

        fx.corrections.mark_fixed(9).unwrap();
        assert!(engine.advance(Stage::SpellCheck, fx.view()).is_advanced());
    }

    #[test]
    fn test_formatting_bold_only_fails() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.document.toggle_style(TextStyle::Bold);

        let remediation = held_message(engine.advance(Stage::FormattingImages, fx.view()));
        assert_eq!(remediation.message, script::NEED_IMAGE_FORMAT);
        assert_eq!(remediation.focus, Some(FocusHint::InsertTools));
        assert_eq!(remediation.display_ms, 4000);
    }

    #[test]
    fn test_formatting_image_only_fails() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.document.attach_image();
        fx.document.apply_image_style(ImageStyle::Shadow).unwrap();

        let remediation = held_message(engine.advance(Stage::FormattingImages, fx.view()));
        assert_eq!(remediation.message, script::NEED_TEXT_FORMAT);
        assert_eq!(remediation.focus, Some(FocusHint::FormattingTools));
    }

    #[test]
    fn test_formatting_unstyled_picture_points_at_picture_tools() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.document.set_text_color("blue");
        fx.document.attach_image();

        let remediation = held_message(engine.advance(Stage::FormattingImages, fx.view()));
        assert_eq!(remediation.focus, Some(FocusHint::PictureTools));
    }

    #[test]
    fn test_formatting_both_halves_pass() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        assert_eq!(
            held_message(engine.advance(Stage::FormattingImages, fx.view())).message,
            script::NEED_BOTH_FORMATS
        );

        fx.document.toggle_style(TextStyle::Bold);
        fx.document.attach_image();
        fx.document.apply_image_style(ImageStyle::Shadow).unwrap();
        assert!(engine.advance(Stage::FormattingImages, fx.view()).is_advanced());
    }

    #[test]
    fn test_contacts_seed_already_satisfies_gate() {
        let engine = StageEngine::default();
        let fx = Fixture::new();
        match engine.advance(Stage::ContactsManagement, fx.view()) {
            AdvanceResult::Advanced { next_stage, side_effects, .. } => {
                assert_eq!(next_stage, Stage::AdvancedCcBcc);
                assert!(side_effects.contains(&SideEffect::Focus { hint: FocusHint::Mail }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cc_or_bcc_requests_tone_check() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.document.load_template();
        assert_eq!(
            held_message(engine.advance(Stage::AdvancedCcBcc, fx.view())).message,
            script::NEED_CC_BCC
        );

        fx.document.set_field(EmailField::Bcc, "friend@school.com");
        match engine.advance(Stage::AdvancedCcBcc, fx.view()) {
            AdvanceResult::Advanced { next_stage, score_delta, side_effects } => {
                assert_eq!(next_stage, Stage::Quiz);
                assert_eq!(score_delta, 50);
                assert_eq!(
                    side_effects,
                    vec![SideEffect::CheckTone {
                        subject: script::TEMPLATE_SUBJECT.to_string(),
                        body: script::TEMPLATE_BODY.to_string(),
                    }]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quiz_reports_clipped_score() {
        let engine = StageEngine::default();
        let mut fx = Fixture::new();
        fx.score = 350;
        assert!(!engine.advance(Stage::Quiz, fx.view()).is_advanced());

        for pick in [1, 2, 2, 1, 0] {
            fx.quiz.answer(pick).unwrap();
            fx.quiz.resume().unwrap();
        }
        fx.quiz.claim().unwrap();

        match engine.advance(Stage::Quiz, fx.view()) {
            AdvanceResult::Advanced { next_stage, score_delta, side_effects } => {
                assert_eq!(next_stage, Stage::Certificate);
                assert_eq!(score_delta, 100);
                assert_eq!(
                    side_effects,
                    vec![SideEffect::ReportCompletion {
                        status: CompletionStatus::Passed,
                        raw: 100,
                        max: 100,
                        min: 0,
                    }]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_certificate_is_terminal() {
        let engine = StageEngine::default();
        let fx = Fixture::new();
        assert_eq!(
            held_message(engine.advance(Stage::Certificate, fx.view())).message,
            script::LESSON_COMPLETE
        );
    }

    #[test]
    fn test_custom_timing_used_for_remediation() {
        let engine = StageEngine::new(Timing::instant());
        let fx = Fixture::new();
        assert_eq!(held_message(engine.advance(Stage::Basics, fx.view())).display_ms, 0);
    }
}
