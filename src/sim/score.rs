//! Touched / missed bookkeeping

use serde::{Deserialize, Serialize};

/// Points per apple in the final score
pub const POINTS_PER_APPLE: u64 = 100;

/// Session counters, reset only when a session starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    touched: u32,
    missed: u32,
}

impl ScoreTracker {
    pub fn touched(&self) -> u32 {
        self.touched
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn record_touch(&mut self) {
        self.touched = self.touched.saturating_add(1);
    }

    pub fn record_miss(&mut self) {
        self.missed = self.missed.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// max(0, touched - missed) * 100
    pub fn final_score(&self) -> u64 {
        u64::from(self.touched.saturating_sub(self.missed)) * POINTS_PER_APPLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_score() {
        let mut score = ScoreTracker::default();
        for _ in 0..7 {
            score.record_touch();
        }
        for _ in 0..3 {
            score.record_miss();
        }
        assert_eq!(score.final_score(), 400);
    }

    #[test]
    fn test_final_score_never_negative() {
        let mut score = ScoreTracker::default();
        score.record_touch();
        score.record_miss();
        score.record_miss();
        assert_eq!(score.final_score(), 0);
    }

    #[test]
    fn test_reset() {
        let mut score = ScoreTracker::default();
        score.record_touch();
        score.record_miss();
        score.reset();
        assert_eq!((score.touched(), score.missed()), (0, 0));
    }
}
