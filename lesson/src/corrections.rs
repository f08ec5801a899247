//! Spell-correction mini task.
//!
//! A fixed sentence with nine misspelled words. Each word is fixed by
//! choosing its single offered replacement; the stage gate opens once all
//! nine are fixed.

use serde::{Deserialize, Serialize};

use crate::score::PointEvent;
use crate::script;
use crate::types::{LessonError, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// One fill-in-the-blank spelling fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CorrectionTask {
    /// Stable ID, 1-based
    pub id: u8,
    pub wrong_form: String,
    pub correct_form: String,
    /// Sentence text before the word
    pub text_before: String,
    /// Sentence text after the word
    pub text_after: String,
    /// Latches to true, never reverts
    pub is_fixed: bool,
}

impl CorrectionTask {
    /// The word as currently displayed.
    pub fn current_form(&self) -> &str {
        if self.is_fixed {
            &self.correct_form
        } else {
            &self.wrong_form
        }
    }
}

/// The ordered set of correction tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CorrectionTaskSet {
    tasks: Vec<CorrectionTask>,
}

impl Default for CorrectionTaskSet {
    fn default() -> Self {
        Self::authored()
    }
}

impl CorrectionTaskSet {
    /// The authored nine-word sentence, all unfixed.
    pub fn authored() -> Self {
        let tasks = script::CORRECTION_TASKS
            .iter()
            .map(|t| CorrectionTask {
                id: t.id,
                wrong_form: t.wrong.to_string(),
                correct_form: t.correct.to_string(),
                text_before: t.before.to_string(),
                text_after: t.after.to_string(),
                is_fixed: false,
            })
            .collect();
        Self { tasks }
    }

    pub fn tasks(&self) -> &[CorrectionTask] {
        &self.tasks
    }

    pub fn get(&self, id: u8) -> Option<&CorrectionTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Apply the offered replacement.
    ///
    /// Only the first fix of a task earns points; marking it again is a
    /// no-op returning `None`.
    pub fn mark_fixed(&mut self, id: u8) -> Result<Option<PointEvent>> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(LessonError::UnknownCorrectionTask(id))?;

        if task.is_fixed {
            return Ok(None);
        }
        task.is_fixed = true;
        Ok(Some(PointEvent::CorrectionFixed))
    }

    /// Close the suggestion menu without choosing. Changes nothing, but the
    /// ID is still checked.
    pub fn dismiss(&self, id: u8) -> Result<()> {
        self.get(id)
            .map(|_| ())
            .ok_or(LessonError::UnknownCorrectionTask(id))
    }

    pub fn fixed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_fixed).count()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &CorrectionTask> {
        self.tasks.iter().filter(|t| !t.is_fixed)
    }

    pub fn all_fixed(&self) -> bool {
        self.tasks.iter().all(|t| t.is_fixed)
    }

    /// The sentence with fixed words corrected and the rest still wrong.
    pub fn rendered_text(&self) -> String {
        self.tasks
            .iter()
            .map(|t| format!("{}{}{}", t.text_before, t.current_form(), t.text_after))
            .collect()
    }
}
