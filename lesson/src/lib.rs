//! Mailcraft lesson core.
//!
//! A scripted, staged mini-game teaching e-mail composition and etiquette.
//! This crate holds the pure, synchronous part of the lesson:
//!
//! - **Data model**: the simulated [`EmailDocument`], the [`ContactBook`],
//!   the spelling [`CorrectionTaskSet`] and the [`Quiz`]
//! - **Scoring**: the monotonically growing [`ScoreCounter`]
//! - **Progression**: the [`StageEngine`], which decides whether the current
//!   [`Stage`] is complete and which side effects the transition requests
//!
//! Nothing here performs I/O. Side effects (AI calls, LMS reporting,
//! transient messages) are returned as [`SideEffect`] values for the
//! session layer to carry out.
//!
//! # Architecture
//!
//! ```text
//! user intent ──► LessonState (document / contacts / corrections / quiz)
//!                      │
//!                      ▼ submit
//!                 StageEngine::advance(stage, view)
//!                      │
//!          ┌───────────┴────────────┐
//!          ▼                        ▼
//!   Advanced { next, delta,    Held { remediation }
//!              side_effects }
//! ```

pub mod contacts;
pub mod corrections;
pub mod document;
pub mod engine;
pub mod quiz;
pub mod score;
pub mod script;
pub mod stage;
pub mod state;
pub mod types;

// Re-export main types
pub use contacts::{Contact, ContactBook};
pub use corrections::{CorrectionTask, CorrectionTaskSet};
pub use document::{EmailDocument, EmailField, ImageStyle, TextStyle};
pub use engine::{AdvanceResult, LessonView, Remediation, SideEffect, StageEngine};
pub use quiz::{AnswerOutcome, Question, Quiz, QuizPhase};
pub use score::{PointAward, PointEvent, ScoreCounter};
pub use stage::Stage;
pub use state::{ActionOutcome, LessonState};
pub use types::*;
