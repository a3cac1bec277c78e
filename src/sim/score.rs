//! Score accrual
//!
//! Embracing earns points, letting go bleeds them. Each tick's change is
//! truncated to whole points and the total never drops below zero.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub score: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one tick of held/released input
    pub fn accrue(&mut self, embracing: bool, dt: f32, tuning: &Tuning) {
        let dt = dt.max(0.0);
        if embracing {
            let gain = (tuning.score_increase_rate * dt).floor() as u64;
            self.score = self.score.saturating_add(gain);
        } else {
            let loss = (tuning.score_decrease_rate * dt).floor() as u64;
            self.score = self.score.saturating_sub(loss);
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
