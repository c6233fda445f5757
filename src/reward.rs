//! Scalar reward for an answered question.
//!
//! Correct answers earn the difficulty's point value plus a speed bonus;
//! wrong answers are penalized from a configurable table. The defaults are
//! the symmetric scheme (failing a HARD question costs as much as passing
//! one earns).

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    state::TimeThresholds,
    types::{DifficultyLevel, ResponseTimeBucket},
};

/// Penalty applied when an answer is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PenaltyTable {
    /// `-points(difficulty)`, the canonical symmetric scheme.
    Symmetric,
    /// Explicit magnitudes per difficulty, indexed EASY/MEDIUM/HARD.
    /// Values are magnitudes; the model negates them. Covers the
    /// historical asymmetric table (harsher for failing EASY, lighter for
    /// failing HARD).
    PerDifficulty([f64; 3]),
}

impl PenaltyTable {
    fn penalty(&self, difficulty: DifficultyLevel, points: f64) -> f64 {
        match self {
            PenaltyTable::Symmetric => -points,
            PenaltyTable::PerDifficulty(magnitudes) => -magnitudes[difficulty.index()],
        }
    }
}

/// Reward shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Point value per difficulty, indexed EASY/MEDIUM/HARD.
    pub difficulty_points: [f64; 3],
    /// Bonus added to correct answers in the FAST bucket.
    pub fast_bonus: f64,
    /// Bonus added to correct answers in the AVERAGE bucket.
    pub average_bonus: f64,
    pub penalties: PenaltyTable,
    pub thresholds: TimeThresholds,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            difficulty_points: [1.0, 2.0, 3.0],
            fast_bonus: 0.5,
            average_bonus: 0.2,
            penalties: PenaltyTable::Symmetric,
            thresholds: TimeThresholds::default(),
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<()> {
        let all_finite = self.difficulty_points.iter().all(|p| p.is_finite())
            && self.fast_bonus.is_finite()
            && self.average_bonus.is_finite();
        if !all_finite {
            return Err(Error::InvalidConfiguration {
                message: "reward parameters must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Pure reward function over (difficulty, correctness, latency).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for one answered question.
    ///
    /// The time bonus applies only to correct answers; a fast wrong answer
    /// earns nothing back.
    pub fn reward(
        &self,
        difficulty: DifficultyLevel,
        correct: bool,
        response_seconds: f64,
    ) -> f64 {
        let points = self.config.difficulty_points[difficulty.index()];
        if !correct {
            return self.config.penalties.penalty(difficulty, points);
        }

        let bonus = match self.config.thresholds.bucket(response_seconds) {
            ResponseTimeBucket::Fast => self.config.fast_bonus,
            ResponseTimeBucket::Average => self.config.average_bonus,
            ResponseTimeBucket::Slow => 0.0,
        };
        points + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_rewards_with_time_bonus() {
        let model = RewardModel::default();
        assert_eq!(model.reward(DifficultyLevel::Easy, true, 2.0), 1.5);
        assert_eq!(model.reward(DifficultyLevel::Medium, true, 7.0), 2.2);
        assert_eq!(model.reward(DifficultyLevel::Hard, true, 15.0), 3.0);
    }

    #[test]
    fn test_symmetric_penalty_ignores_speed() {
        let model = RewardModel::default();
        assert_eq!(model.reward(DifficultyLevel::Easy, false, 1.0), -1.0);
        assert_eq!(model.reward(DifficultyLevel::Medium, false, 1.0), -2.0);
        assert_eq!(model.reward(DifficultyLevel::Hard, false, 20.0), -3.0);
    }

    #[test]
    fn test_asymmetric_penalty_table() {
        let model = RewardModel::new(RewardConfig {
            penalties: PenaltyTable::PerDifficulty([3.0, 2.0, 1.0]),
            ..RewardConfig::default()
        });
        // Failing EASY hurts most, failing HARD least.
        assert_eq!(model.reward(DifficultyLevel::Easy, false, 4.0), -3.0);
        assert_eq!(model.reward(DifficultyLevel::Hard, false, 4.0), -1.0);
        // Correct branch unaffected.
        assert_eq!(model.reward(DifficultyLevel::Hard, true, 4.0), 3.5);
    }

    #[test]
    fn test_validation_rejects_non_finite() {
        let config = RewardConfig {
            fast_bonus: f64::NAN,
            ..RewardConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(RewardConfig::default().validate().is_ok());
    }
}
