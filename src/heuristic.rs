//! Deterministic fallback policy for states with no recorded Q-values.
//!
//! Answering well and fast escalates, struggling de-escalates, mixed
//! signals hold. This replaces the blind "default to EASY" an empty
//! Q-table lookup would otherwise produce.

use crate::{
    state::{StateComponents, StateKey},
    types::{AccuracyBand, DifficultyLevel, ResponseTimeBucket},
};

/// Default difficulty for a state the agent has never scored.
pub fn heuristic_action(state: &StateKey) -> DifficultyLevel {
    match state.components() {
        // Warm-up: the very first question of a cold session is easy.
        StateComponents::Start => DifficultyLevel::Easy,
        // Never used to pick an action; returning something keeps the
        // function total.
        StateComponents::Terminal => DifficultyLevel::Easy,
        StateComponents::Composite {
            last_difficulty,
            correct,
            bucket,
        } => {
            if correct && bucket == ResponseTimeBucket::Fast {
                last_difficulty.step_up()
            } else if !correct || bucket == ResponseTimeBucket::Slow {
                last_difficulty.step_down()
            } else {
                last_difficulty
            }
        }
        StateComponents::Accuracy { band, bucket } => {
            let base = match band {
                AccuracyBand::Low => DifficultyLevel::Easy,
                AccuracyBand::Medium => DifficultyLevel::Medium,
                AccuracyBand::High => DifficultyLevel::Hard,
            };
            if bucket == ResponseTimeBucket::Slow {
                base.step_down()
            } else {
                base
            }
        }
        // Key produced by an unknown encoder; hold the middle ground.
        StateComponents::Opaque => DifficultyLevel::Medium,
    }
}
