//! Explicit per-session lesson state.
//!
//! Everything that a full restart resets lives in [`LessonState`]. Actions
//! mutate it and award points; [`LessonState::commit_advance`] applies a
//! transition decided by the [`StageEngine`](crate::engine::StageEngine).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contacts::{Contact, ContactBook};
use crate::corrections::CorrectionTaskSet;
use crate::document::{EmailDocument, EmailField, ImageStyle, TextStyle};
use crate::engine::{LessonView, SideEffect};
use crate::quiz::{AnswerOutcome, Quiz, QuizPhase};
use crate::score::{PointEvent, ScoreCounter};
use crate::script;
use crate::stage::Stage;
use crate::types::{FocusHint, LessonError, MysteryReply, Result, Timing};

/// What an action earned and asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub points: u32,
    pub side_effects: Vec<SideEffect>,
}

impl ActionOutcome {
    fn points(points: u32) -> Self {
        Self {
            points,
            side_effects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LessonState {
    stage: Stage,
    student_name: String,
    document: EmailDocument,
    contacts: ContactBook,
    corrections: CorrectionTaskSet,
    quiz: Quiz,
    score: ScoreCounter,
    mystery_reply: Option<MysteryReply>,
}

impl LessonState {
    /// Fresh state: Intro stage, empty draft, seeded contacts, score zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    pub fn score_counter(&self) -> &ScoreCounter {
        &self.score
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Name printed on the certificate.
    pub fn certificate_name(&self) -> &str {
        let name = self.student_name.trim();
        if name.is_empty() {
            script::DEFAULT_CERTIFICATE_NAME
        } else {
            name
        }
    }

    pub fn document(&self) -> &EmailDocument {
        &self.document
    }

    pub fn contacts(&self) -> &ContactBook {
        &self.contacts
    }

    pub fn corrections(&self) -> &CorrectionTaskSet {
        &self.corrections
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn mystery_reply(&self) -> Option<&MysteryReply> {
        self.mystery_reply.as_ref()
    }

    /// Borrowed view for the engine.
    pub fn view(&self) -> LessonView<'_> {
        LessonView {
            student_name: &self.student_name,
            document: &self.document,
            contacts: &self.contacts,
            corrections: &self.corrections,
            quiz: &self.quiz,
            score: self.score.total(),
        }
    }

    /// The name can only be typed on the intro screen.
    pub fn set_student_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.require_stage(Stage::Intro)?;
        self.student_name = name.into();
        Ok(())
    }

    // ===== Document =====

    pub fn set_field(&mut self, field: EmailField, value: impl Into<String>) {
        self.document.set_field(field, value);
    }

    pub fn toggle_style(&mut self, style: TextStyle) -> ActionOutcome {
        let event = self.document.toggle_style(style);
        ActionOutcome::points(self.award(event))
    }

    pub fn set_text_color(&mut self, color: impl Into<String>) -> ActionOutcome {
        let event = self.document.set_text_color(color);
        ActionOutcome::points(self.award(event))
    }

    /// Insert the picture. The first insertion nudges the student towards
    /// the picture tools.
    pub fn attach_image(&mut self, timing: &Timing) -> ActionOutcome {
        let Some(event) = self.document.attach_image() else {
            return ActionOutcome::default();
        };
        ActionOutcome {
            points: self.score.award(event),
            side_effects: vec![
                SideEffect::Focus { hint: FocusHint::PictureTools },
                SideEffect::ShowMessage {
                    text: script::PICK_IMAGE_STYLE.to_string(),
                    display_ms: timing.remediation_ms,
                },
            ],
        }
    }

    pub fn apply_image_style(&mut self, style: ImageStyle) -> Result<ActionOutcome> {
        let event = self.document.apply_image_style(style)?;
        Ok(ActionOutcome::points(self.award(event)))
    }

    pub fn load_template(&mut self) {
        self.document.load_template();
    }

    pub fn clear_document(&mut self) {
        self.document.clear();
    }

    // ===== Contacts =====

    pub fn add_contact(&mut self, name: &str, email: &str) -> Result<(Contact, ActionOutcome)> {
        let (contact, event) = self.contacts.add(name, email)?;
        let contact = contact.clone();
        let points = self.score.award(event);
        debug!(contact_id = %contact.id, "Contact added");
        Ok((contact, ActionOutcome::points(points)))
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        self.contacts.toggle_favorite(id)
    }

    // ===== Corrections =====

    pub fn fix_word(&mut self, id: u8) -> Result<ActionOutcome> {
        let event = self.corrections.mark_fixed(id)?;
        Ok(ActionOutcome::points(self.award(event)))
    }

    pub fn dismiss_suggestion(&self, id: u8) -> Result<()> {
        self.corrections.dismiss(id)
    }

    // ===== Quiz =====

    pub fn answer_quiz(&mut self, choice: usize) -> Result<(AnswerOutcome, ActionOutcome)> {
        self.require_stage(Stage::Quiz)?;
        let outcome = self.quiz.answer(choice)?;
        let points = self.award(outcome.point_event());
        Ok((outcome, ActionOutcome::points(points)))
    }

    pub fn resume_quiz(&mut self) -> Result<QuizPhase> {
        self.require_stage(Stage::Quiz)?;
        self.quiz.resume()
    }

    pub fn claim_certificate(&mut self) -> Result<()> {
        self.require_stage(Stage::Quiz)?;
        self.quiz.claim()
    }

    // ===== Progression =====

    /// Apply a transition produced by the engine.
    ///
    /// `next` must be the stage directly after the current one.
    pub fn commit_advance(&mut self, next: Stage, score_delta: u32) -> Result<()> {
        if self.stage.next() != Some(next) {
            return Err(LessonError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }

        let from = self.stage;
        let points = self.score.award(PointEvent::StageCleared { stage: from });
        debug_assert_eq!(points, score_delta);
        self.stage = next;

        info!(from = ?from, to = ?next, score = self.score.total(), "Stage advanced");
        Ok(())
    }

    /// Store the mystery reply. The first reply wins.
    pub fn set_mystery_reply(&mut self, reply: MysteryReply) -> bool {
        if self.mystery_reply.is_some() {
            return false;
        }
        self.mystery_reply = Some(reply);
        true
    }

    fn award(&mut self, event: Option<PointEvent>) -> u32 {
        event.map(|e| self.score.award(e)).unwrap_or(0)
    }

    fn require_stage(&self, expected: Stage) -> Result<()> {
        if self.stage != expected {
            return Err(LessonError::WrongStage {
                current: self.stage,
                expected,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AdvanceResult, StageEngine};

    fn submit(state: &mut LessonState, engine: &StageEngine) -> AdvanceResult {
        let result = engine.advance(state.stage(), state.view());
        if let AdvanceResult::Advanced { next_stage, score_delta, .. } = &result {
            state.commit_advance(*next_stage, *score_delta).unwrap();
        }
        result
    }

    #[test]
    fn test_new_state() {
        let state = LessonState::new();
        assert_eq!(state.stage(), Stage::Intro);
        assert_eq!(state.score(), 0);
        assert_eq!(state.contacts().len(), 2);
        assert_eq!(state.certificate_name(), script::DEFAULT_CERTIFICATE_NAME);
    }

    #[test]
    fn test_failed_checks_change_nothing() {
        let engine = StageEngine::default();
        let mut state = LessonState::new();
        state.set_student_name("Layla").unwrap();
        submit(&mut state, &engine);

        let before = state.score();
        for _ in 0..3 {
            assert!(!submit(&mut state, &engine).is_advanced());
        }
        assert_eq!(state.stage(), Stage::Basics);
        assert_eq!(state.score(), before);
    }

    #[test]
    fn test_commit_rejects_skips_and_repeats() {
        let mut state = LessonState::new();
        assert!(matches!(
            state.commit_advance(Stage::SpellCheck, 50),
            Err(LessonError::InvalidTransition { .. })
        ));
        state.commit_advance(Stage::Basics, 0).unwrap();
        assert!(state.commit_advance(Stage::Basics, 0).is_err());
        assert!(state.commit_advance(Stage::Intro, 0).is_err());
    }

    #[test]
    fn test_name_locked_after_intro() {
        let mut state = LessonState::new();
        state.set_student_name("Layla").unwrap();
        state.commit_advance(Stage::Basics, 0).unwrap();
        assert!(matches!(
            state.set_student_name("Other"),
            Err(LessonError::WrongStage { .. })
        ));
        assert_eq!(state.student_name(), "Layla");
    }

    #[test]
    fn test_action_points() {
        let timing = Timing::default();
        let mut state = LessonState::new();

        assert_eq!(state.toggle_style(TextStyle::Bold).points, 10);
        assert_eq!(state.set_text_color("red").points, 0);

        let attach = state.attach_image(&timing);
        assert_eq!(attach.points, 20);
        assert!(attach
            .side_effects
            .contains(&SideEffect::Focus { hint: FocusHint::PictureTools }));
        assert_eq!(state.attach_image(&timing), ActionOutcome::default());

        assert_eq!(state.apply_image_style(ImageStyle::Border).unwrap().points, 10);
        assert_eq!(state.fix_word(1).unwrap().points, 10);
        assert_eq!(state.fix_word(1).unwrap().points, 0);
        assert_eq!(state.add_contact("Sara", "sara@x.com").unwrap().1.points, 30);

        assert_eq!(state.score(), 10 + 20 + 10 + 10 + 30);
    }

    #[test]
    fn test_quiz_only_in_quiz_stage() {
        let mut state = LessonState::new();
        assert!(matches!(
            state.answer_quiz(0),
            Err(LessonError::WrongStage { .. })
        ));
        assert!(state.claim_certificate().is_err());
    }

    #[test]
    fn test_first_mystery_reply_wins() {
        let mut state = LessonState::new();
        assert!(state.set_mystery_reply(MysteryReply::new("a", "b")));
        assert!(!state.set_mystery_reply(MysteryReply::new("c", "d")));
        assert_eq!(state.mystery_reply().map(|r| r.subject.as_str()), Some("a"));
    }

    #[test]
    fn test_full_run_scores_450() {
        let engine = StageEngine::default();
        let mut state = LessonState::new();

        state.set_student_name("Layla").unwrap();
        submit(&mut state, &engine);

        state.set_field(EmailField::To, "a@b.com");
        state.set_field(EmailField::Subject, "Hi");
        state.set_field(EmailField::Body, "Hello");
        submit(&mut state, &engine);
        assert_eq!(state.score(), 50);

        // Bypass per-action points to isolate the stage bonuses
        for id in 1..=9 {
            state.corrections.mark_fixed(id).unwrap();
        }
        submit(&mut state, &engine);

        state.document.toggle_style(TextStyle::Bold);
        state.document.attach_image();
        state.document.apply_image_style(ImageStyle::Shadow).unwrap();
        submit(&mut state, &engine);
        submit(&mut state, &engine);

        state.set_field(EmailField::Cc, "friend@school.com");
        submit(&mut state, &engine);
        assert_eq!(state.stage(), Stage::Quiz);
        assert_eq!(state.score(), 250);

        for pick in [1, 2, 2, 1, 0] {
            state.answer_quiz(pick).unwrap();
            state.resume_quiz().unwrap();
        }
        state.claim_certificate().unwrap();
        submit(&mut state, &engine);

        assert_eq!(state.stage(), Stage::Certificate);
        assert_eq!(state.score(), 450);
    }
}
