//! Session score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Discrete point-awarding event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointEvent {
    /// A stage check passed
    StageCleared { stage: Stage },
    /// A misspelled word was fixed
    CorrectionFixed,
    /// First text style or colour applied to the document
    FirstFormatting,
    /// Picture inserted
    ImageAttached,
    /// Picture styled for the first time
    ImageStyled,
    /// New contact saved
    ContactAdded,
    /// Quiz question answered correctly
    QuizAnswerCorrect,
}

impl PointEvent {
    /// Fixed increment for this event.
    pub fn points(self) -> u32 {
        match self {
            PointEvent::StageCleared { stage } => stage_bonus(stage),
            PointEvent::CorrectionFixed => 10,
            PointEvent::FirstFormatting => 10,
            PointEvent::ImageStyled => 10,
            PointEvent::ImageAttached => 20,
            PointEvent::QuizAnswerCorrect => 20,
            PointEvent::ContactAdded => 30,
        }
    }
}

/// Points for passing the check of `stage`.
pub fn stage_bonus(stage: Stage) -> u32 {
    match stage {
        Stage::Intro | Stage::Certificate => 0,
        Stage::Quiz => 100,
        _ => 50,
    }
}

/// A recorded award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointAward {
    pub event: PointEvent,
    pub points: u32,
    pub awarded_at: DateTime<Utc>,
}

/// Non-decreasing session score.
///
/// Only a full restart (a fresh counter) brings it back to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreCounter {
    total: u32,
    history: Vec<PointAward>,
}

impl ScoreCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Awards, oldest first.
    pub fn history(&self) -> &[PointAward] {
        &self.history
    }

    /// Add the event's increment. Zero-point events are not recorded.
    pub fn award(&mut self, event: PointEvent) -> u32 {
        let points = event.points();
        if points == 0 {
            return 0;
        }
        self.total = self.total.saturating_add(points);
        self.history.push(PointAward {
            event,
            points,
            awarded_at: Utc::now(),
        });
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_accumulates() {
        let mut score = ScoreCounter::new();
        score.award(PointEvent::StageCleared { stage: Stage::Basics });
        score.award(PointEvent::CorrectionFixed);
        score.award(PointEvent::ContactAdded);
        assert_eq!(score.total(), 90);
        assert_eq!(score.history().len(), 3);
    }

    #[test]
    fn test_intro_awards_nothing() {
        let mut score = ScoreCounter::new();
        assert_eq!(score.award(PointEvent::StageCleared { stage: Stage::Intro }), 0);
        assert_eq!(score.total(), 0);
        assert!(score.history().is_empty());
    }

    #[test]
    fn test_stage_bonuses() {
        let total: u32 = Stage::ALL.iter().map(|s| stage_bonus(*s)).sum();
        assert_eq!(total, 50 * 5 + 100);
    }
}
