//! Quiz sub-engine.
//!
//! ```text
//! Asking(i) ──answer──► Feedback(i, chosen) ──resume──► Asking(i + 1)
//!                                              └──────► Result (after the last question)
//! ```
//!
//! The feedback window is locked: answers are refused until `resume` is
//! called. Timing the window is the caller's job.

use serde::{Deserialize, Serialize};

use crate::score::PointEvent;
use crate::script;
use crate::types::{LessonError, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index of the correct option
    pub correct: usize,
}

/// Where the quiz is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizPhase {
    Asking { question: usize },
    Feedback { question: usize, chosen: usize, correct: bool },
    Result { correct: usize, total: usize },
}

/// Result of answering a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AnswerOutcome {
    pub question: usize,
    pub chosen: usize,
    pub correct_option: usize,
    pub is_correct: bool,
}

impl AnswerOutcome {
    /// Point event earned by this answer, if any.
    pub fn point_event(&self) -> Option<PointEvent> {
        self.is_correct.then_some(PointEvent::QuizAnswerCorrect)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Quiz {
    questions: Vec<Question>,
    phase: QuizPhase,
    correct_count: usize,
    claimed: bool,
}

impl Default for Quiz {
    fn default() -> Self {
        Self::authored()
    }
}

impl Quiz {
    /// The five authored questions.
    pub fn authored() -> Self {
        let questions = script::QUIZ_QUESTIONS
            .iter()
            .map(|q| Question {
                prompt: q.prompt.to_string(),
                options: q.options.iter().map(|o| o.to_string()).collect(),
                correct: q.correct,
            })
            .collect();
        Self::with_questions(questions)
    }

    /// Quiz over custom questions.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let phase = if questions.is_empty() {
            QuizPhase::Result { correct: 0, total: 0 }
        } else {
            QuizPhase::Asking { question: 0 }
        };
        Self {
            questions,
            phase,
            correct_count: 0,
            claimed: false,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question currently on screen (asking or feedback).
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Asking { question } | QuizPhase::Feedback { question, .. } => {
                self.questions.get(question)
            }
            QuizPhase::Result { .. } => None,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, QuizPhase::Result { .. })
    }

    /// Whether the student claimed the certificate from the result screen.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Record an answer and enter the locked feedback window.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerOutcome> {
        let question = match self.phase {
            QuizPhase::Asking { question } => question,
            QuizPhase::Feedback { .. } => return Err(LessonError::QuizLocked),
            QuizPhase::Result { .. } => {
                return Err(LessonError::QuizPhase("quiz already finished".to_string()))
            }
        };

        let q = &self.questions[question];
        if choice >= q.options.len() {
            return Err(LessonError::InvalidChoice {
                choice,
                options: q.options.len(),
            });
        }

        let is_correct = choice == q.correct;
        if is_correct {
            self.correct_count += 1;
        }
        self.phase = QuizPhase::Feedback {
            question,
            chosen: choice,
            correct: is_correct,
        };

        Ok(AnswerOutcome {
            question,
            chosen: choice,
            correct_option: q.correct,
            is_correct,
        })
    }

    /// Leave the feedback window: next question, or the result after the
    /// last one.
    pub fn resume(&mut self) -> Result<QuizPhase> {
        let question = match self.phase {
            QuizPhase::Feedback { question, .. } => question,
            _ => return Err(LessonError::QuizPhase("no feedback to dismiss".to_string())),
        };

        self.phase = if question + 1 < self.questions.len() {
            QuizPhase::Asking { question: question + 1 }
        } else {
            QuizPhase::Result {
                correct: self.correct_count,
                total: self.questions.len(),
            }
        };
        Ok(self.phase)
    }

    /// "Claim certificate" on the result screen.
    pub fn claim(&mut self) -> Result<()> {
        if !self.is_finished() {
            return Err(LessonError::QuizPhase("quiz not finished".to_string()));
        }
        self.claimed = true;
        Ok(())
    }
}
