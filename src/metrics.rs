//! Per-session performance accounting.
//!
//! Tracks every answered question so the orchestrator can compute rolling
//! accuracy for the accuracy-keyed encoder mode and hosts can show or
//! export end-of-session numbers. All ratios are 0.0 when nothing has been
//! answered; nothing here divides by zero.

use crate::types::{DifficultyLevel, Observation};

/// Accumulated outcomes for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionMetrics {
    answered: Vec<Observation>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, observation: Observation) {
        self.answered.push(observation);
    }

    pub fn questions_answered(&self) -> usize {
        self.answered.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answered.iter().filter(|o| o.correct).count()
    }

    /// Accuracy over the whole session, 0.0 when nothing answered.
    pub fn total_accuracy(&self) -> f64 {
        Self::ratio(self.correct_count(), self.answered.len())
    }

    /// Accuracy over the last `window` answers; `None` means whole session.
    pub fn rolling_accuracy(&self, window: Option<usize>) -> f64 {
        let slice: &[Observation] = match window {
            Some(n) if n < self.answered.len() => &self.answered[self.answered.len() - n..],
            _ => &self.answered,
        };
        Self::ratio(slice.iter().filter(|o| o.correct).count(), slice.len())
    }

    /// Accuracy restricted to one difficulty, 0.0 when never asked.
    pub fn accuracy_for(&self, difficulty: DifficultyLevel) -> f64 {
        let total = self.total_for(difficulty);
        let correct = self
            .answered
            .iter()
            .filter(|o| o.difficulty == difficulty && o.correct)
            .count();
        Self::ratio(correct, total)
    }

    pub fn total_for(&self, difficulty: DifficultyLevel) -> usize {
        self.answered
            .iter()
            .filter(|o| o.difficulty == difficulty)
            .count()
    }

    /// Mean response latency in seconds, 0.0 when nothing answered.
    pub fn mean_response_seconds(&self) -> f64 {
        if self.answered.is_empty() {
            return 0.0;
        }
        self.answered.iter().map(|o| o.response_seconds).sum::<f64>() / self.answered.len() as f64
    }

    pub fn last(&self) -> Option<&Observation> {
        self.answered.last()
    }

    fn ratio(numerator: usize, denominator: usize) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    }
}
