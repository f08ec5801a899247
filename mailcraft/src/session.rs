//! LessonSession - one student's run through the lesson.
//!
//! Owns the lesson state and carries out the side effects the stage engine
//! asks for. The tone check is awaited before its transition commits; the
//! mystery reply runs in the background and is applied on the next poll.
//!
//! Background results carry the epoch they were started in. A restart
//! bumps the epoch, so anything still in flight from the previous run is
//! dropped when it lands.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use lesson::{
    ActionOutcome, AdvanceResult, CompletionStatus, Contact, EmailField, ImageStyle, LessonState,
    MysteryReply, QuizPhase, Result as LessonResult, SideEffect, Stage, StageEngine, TextStyle,
    Timing,
};
use scorm::LmsReporter;
use tutor_agent::{prompt, TutorOutcome, TutorService};

use crate::certificate::{Certificate, CertificateExporter, ExportError};
use crate::config::MailcraftConfig;
use crate::notice::Notice;

/// A mystery reply tagged with the epoch it was requested in.
#[derive(Debug)]
struct PendingReply {
    epoch: u64,
    outcome: TutorOutcome<MysteryReply>,
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a watch::Sender<bool>);

impl<'a> BusyGuard<'a> {
    fn raise(busy: &'a watch::Sender<bool>) -> Self {
        busy.send_replace(true);
        Self(busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

pub struct LessonSession {
    state: LessonState,
    engine: StageEngine,
    tutor: Arc<TutorService>,
    lms: LmsReporter,
    exporter: CertificateExporter,
    /// Bumped on every restart
    epoch: u64,
    reply_tx: mpsc::UnboundedSender<PendingReply>,
    reply_rx: mpsc::UnboundedReceiver<PendingReply>,
    background: Vec<JoinHandle<()>>,
    busy: watch::Sender<bool>,
}

impl LessonSession {
    /// Start a session and open the LMS connection.
    pub fn new(
        tutor: Arc<TutorService>,
        lms: LmsReporter,
        exporter: CertificateExporter,
        timing: Timing,
    ) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let (busy, _) = watch::channel(false);

        lms.initialize();

        Self {
            state: LessonState::new(),
            engine: StageEngine::new(timing),
            tutor,
            lms,
            exporter,
            epoch: 0,
            reply_tx,
            reply_rx,
            background: Vec::new(),
            busy,
        }
    }

    /// Session wired from configuration.
    pub fn from_config(config: &MailcraftConfig, tutor: Arc<TutorService>, lms: LmsReporter) -> Self {
        Self::new(
            tutor,
            lms,
            CertificateExporter::new(config.certificate.output_dir.clone()),
            config.timing.clone(),
        )
    }

    pub fn state(&self) -> &LessonState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn timing(&self) -> &Timing {
        self.engine.timing()
    }

    /// True while an awaited tutor call is in flight.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    // ===== Intro =====

    pub fn set_student_name(&mut self, name: &str) -> LessonResult<()> {
        self.state.set_student_name(name)
    }

    // ===== Document =====

    pub fn set_field(&mut self, field: EmailField, value: &str) {
        self.state.set_field(field, value);
    }

    pub fn toggle_style(&mut self, style: TextStyle) -> Vec<Notice> {
        let outcome = self.state.toggle_style(style);
        self.action_notices(outcome)
    }

    pub fn set_text_color(&mut self, color: &str) -> Vec<Notice> {
        let outcome = self.state.set_text_color(color);
        self.action_notices(outcome)
    }

    pub fn attach_image(&mut self) -> Vec<Notice> {
        let outcome = self.state.attach_image(self.engine.timing());
        self.action_notices(outcome)
    }

    pub fn apply_image_style(&mut self, style: ImageStyle) -> LessonResult<Vec<Notice>> {
        let outcome = self.state.apply_image_style(style)?;
        Ok(self.action_notices(outcome))
    }

    pub fn load_template(&mut self) {
        self.state.load_template();
    }

    pub fn clear_document(&mut self) {
        self.state.clear_document();
    }

    // ===== Contacts =====

    pub fn add_contact(&mut self, name: &str, email: &str) -> LessonResult<(Contact, Vec<Notice>)> {
        let (contact, outcome) = self.state.add_contact(name, email)?;
        Ok((contact, self.action_notices(outcome)))
    }

    pub fn toggle_favorite(&mut self, id: &str) -> LessonResult<bool> {
        self.state.toggle_favorite(id)
    }

    // ===== Corrections =====

    pub fn fix_word(&mut self, id: u8) -> LessonResult<Vec<Notice>> {
        let outcome = self.state.fix_word(id)?;
        Ok(self.action_notices(outcome))
    }

    pub fn dismiss_suggestion(&self, id: u8) -> LessonResult<()> {
        self.state.dismiss_suggestion(id)
    }

    // ===== Quiz =====

    /// Answer the current question.
    ///
    /// Input stays locked for the feedback window, then the quiz moves on
    /// by itself.
    pub async fn answer_quiz(&mut self, choice: usize) -> LessonResult<Vec<Notice>> {
        let (answer, outcome) = self.state.answer_quiz(choice)?;

        let mut notices = vec![Notice::QuizFeedback {
            is_correct: answer.is_correct,
            correct_option: answer.correct_option,
        }];
        notices.extend(self.action_notices(outcome));

        tokio::time::sleep(self.engine.timing().quiz_feedback()).await;

        let phase = self.state.resume_quiz()?;
        if let QuizPhase::Result { correct, total } = phase {
            info!(correct, total, "Quiz finished");
        }
        Ok(notices)
    }

    /// "Claim certificate" on the quiz result screen.
    ///
    /// Claiming completes the quiz stage: the bonus is awarded, the result
    /// goes to the LMS and the lesson moves to the certificate.
    pub async fn claim_certificate(&mut self) -> LessonResult<Vec<Notice>> {
        self.state.claim_certificate()?;
        Ok(self.submit().await)
    }

    // ===== Progression =====

    /// Check the current stage and, on success, move to the next one.
    pub async fn submit(&mut self) -> Vec<Notice> {
        let stage = self.state.stage();
        let result = self.engine.advance(stage, self.state.view());

        let (next_stage, score_delta, side_effects) = match result {
            AdvanceResult::Held { remediation } => {
                debug!(stage = ?stage, message = %remediation.message, "Stage held");
                let mut notices = vec![Notice::message(remediation.message, remediation.display_ms)];
                notices.extend(remediation.focus.map(|hint| Notice::Focus { hint }));
                return notices;
            }
            AdvanceResult::Advanced {
                next_stage,
                score_delta,
                side_effects,
            } => (next_stage, score_delta, side_effects),
        };

        let mut notices = Vec::new();

        // Awaited effects run before the transition commits
        for effect in &side_effects {
            if let SideEffect::CheckTone { subject, body } = effect {
                let feedback = self.check_tone(subject, body).await;
                let display_ms = self.engine.timing().tone_feedback_ms;
                notices.push(Notice::message(feedback, display_ms));
                tokio::time::sleep(self.engine.timing().tone_feedback()).await;
            }
        }

        if let Err(e) = self.state.commit_advance(next_stage, score_delta) {
            error!(error = %e, "Transition rejected");
            return notices;
        }
        notices.push(Notice::Points {
            gained: score_delta,
            total: self.state.score(),
        });
        notices.push(Notice::StageChanged { stage: next_stage });

        for effect in &side_effects {
            match effect {
                SideEffect::GenerateMysteryReply { student_name } => {
                    self.spawn_mystery_reply(student_name.clone());
                }
                SideEffect::ReportCompletion {
                    status,
                    raw,
                    max,
                    min,
                } => self.report_completion(*status, *raw, *max, *min),
                SideEffect::CheckTone { .. } => {}
                other => notices.extend(Notice::from_side_effect(other)),
            }
        }

        notices
    }

    /// Apply background results that have already arrived.
    pub fn poll_background(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(reply) = self.reply_rx.try_recv() {
            notices.extend(self.apply_reply(reply));
        }
        self.background.retain(|handle| !handle.is_finished());
        notices
    }

    /// Wait up to `within` for a background result of the current run.
    pub async fn await_background(&mut self, within: Duration) -> Vec<Notice> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            match tokio::time::timeout_at(deadline, self.reply_rx.recv()).await {
                Ok(Some(reply)) => {
                    let notices = self.apply_reply(reply);
                    if !notices.is_empty() {
                        return notices;
                    }
                }
                Ok(None) | Err(_) => return Vec::new(),
            }
        }
    }

    /// Start over: zero every piece of lesson state and reopen the LMS.
    ///
    /// Tutor calls still in flight finish, but their results are ignored.
    pub fn restart(&mut self) -> Vec<Notice> {
        self.epoch += 1;
        self.state = LessonState::new();
        self.lms.initialize();

        info!(epoch = self.epoch, "Lesson restarted");
        vec![Notice::StageChanged { stage: Stage::Intro }]
    }

    /// Write the certificate. Lesson state is untouched either way.
    pub fn export_certificate(&self) -> Result<std::path::PathBuf, ExportError> {
        if self.state.stage() != Stage::Certificate {
            warn!(stage = ?self.state.stage(), "Exporting certificate before the lesson ended");
        }
        let certificate = Certificate::new(self.state.certificate_name(), self.state.score());
        self.exporter.export(&certificate)
    }

    /// End the session: drop pending tutor calls and close the LMS connection.
    pub fn shutdown(&mut self) {
        for handle in self.background.drain(..) {
            handle.abort();
        }
        self.lms.terminate();
        info!(score = self.state.score(), stage = ?self.state.stage(), "Session closed");
    }

    // ===== Internals =====

    fn action_notices(&self, outcome: ActionOutcome) -> Vec<Notice> {
        let mut notices = Vec::new();
        if outcome.points > 0 {
            notices.push(Notice::Points {
                gained: outcome.points,
                total: self.state.score(),
            });
        }
        notices.extend(outcome.side_effects.iter().filter_map(Notice::from_side_effect));
        notices
    }

    async fn check_tone(&self, subject: &str, body: &str) -> String {
        let _busy = BusyGuard::raise(&self.busy);

        match self.tutor.check_tone(subject, body).await {
            TutorOutcome::Generated(text) => text,
            TutorOutcome::Fallback { content, reason } => {
                debug!(reason = ?reason, "Tone check fell back");
                content
            }
            TutorOutcome::Failed(reason) => {
                warn!(reason = ?reason, "Tone check failed, moving on");
                prompt::OFFLINE_TONE.to_string()
            }
        }
    }

    fn spawn_mystery_reply(&mut self, student_name: String) {
        let tutor = Arc::clone(&self.tutor);
        let tx = self.reply_tx.clone();
        let epoch = self.epoch;

        let handle = tokio::spawn(async move {
            let outcome = tutor.generate_reply(&student_name).await;
            // Receiver gone means the session closed
            let _ = tx.send(PendingReply { epoch, outcome });
        });
        self.background.push(handle);
    }

    fn apply_reply(&mut self, reply: PendingReply) -> Vec<Notice> {
        if reply.epoch != self.epoch {
            debug!(
                reply_epoch = reply.epoch,
                epoch = self.epoch,
                "Discarding mystery reply from a previous run"
            );
            return Vec::new();
        }

        let Some(content) = reply.outcome.into_content() else {
            debug!("No mystery reply to show");
            return Vec::new();
        };

        if self.state.set_mystery_reply(content.clone()) {
            vec![Notice::MysteryReply(content)]
        } else {
            Vec::new()
        }
    }

    fn report_completion(&self, status: CompletionStatus, raw: u32, max: u32, min: u32) {
        self.lms.report_status(status);
        self.lms.report_score(raw, max, min);
    }
}

impl Drop for LessonSession {
    fn drop(&mut self) {
        for handle in &self.background {
            handle.abort();
        }
    }
}
