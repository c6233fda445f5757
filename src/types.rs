//! Core domain types: difficulty levels, response-time buckets and questions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Question difficulty. Doubles as the agents' action space and as the
/// content-selection key handed to a [`crate::ports::ContentSource`].
///
/// The ordinal discriminants (0, 1, 2) are part of the persisted snapshot
/// format, so the enum serializes as its integer value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum DifficultyLevel {
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl DifficultyLevel {
    /// All actions, in ordinal order.
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    /// Ordinal index, matching the persisted discriminant.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next harder level, saturating at [`DifficultyLevel::Hard`].
    pub fn step_up(self) -> Self {
        match self {
            DifficultyLevel::Easy => DifficultyLevel::Medium,
            DifficultyLevel::Medium | DifficultyLevel::Hard => DifficultyLevel::Hard,
        }
    }

    /// Next easier level, saturating at [`DifficultyLevel::Easy`].
    pub fn step_down(self) -> Self {
        match self {
            DifficultyLevel::Hard => DifficultyLevel::Medium,
            DifficultyLevel::Medium | DifficultyLevel::Easy => DifficultyLevel::Easy,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DifficultyLevel::Easy => "EASY",
            DifficultyLevel::Medium => "MEDIUM",
            DifficultyLevel::Hard => "HARD",
        };
        write!(f, "{label}")
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DifficultyLevel::Easy),
            1 => Ok(DifficultyLevel::Medium),
            2 => Ok(DifficultyLevel::Hard),
            _ => Err(Error::UnknownAction { value }),
        }
    }
}

/// Discretized response latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseTimeBucket {
    Fast,
    Average,
    Slow,
}

impl fmt::Display for ResponseTimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResponseTimeBucket::Fast => "FAST",
            ResponseTimeBucket::Average => "AVERAGE",
            ResponseTimeBucket::Slow => "SLOW",
        };
        write!(f, "{label}")
    }
}

/// Rolling-accuracy band used by the accuracy-keyed encoder mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyBand {
    Low,
    Medium,
    High,
}

impl AccuracyBand {
    /// Band for an accuracy ratio in `[0, 1]`: below 0.4 is low, below 0.7
    /// is medium, everything else high.
    pub fn from_ratio(accuracy: f64) -> Self {
        if accuracy < 0.4 {
            AccuracyBand::Low
        } else if accuracy < 0.7 {
            AccuracyBand::Medium
        } else {
            AccuracyBand::High
        }
    }
}

impl fmt::Display for AccuracyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccuracyBand::Low => "LOW",
            AccuracyBand::Medium => "MEDIUM",
            AccuracyBand::High => "HIGH",
        };
        write!(f, "{label}")
    }
}

/// One question served by a content source.
///
/// The controller never inspects the prompt; it only needs the difficulty
/// tag and (for the default evaluator) the expected answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub difficulty: DifficultyLevel,
    pub correct_answers: Vec<String>,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        difficulty: DifficultyLevel,
        correct_answers: Vec<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            difficulty,
            correct_answers,
        }
    }
}

/// A single answered question as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Difficulty of the question that was answered.
    pub difficulty: DifficultyLevel,
    /// Whether the submitted answers were correct.
    pub correct: bool,
    /// Latency between presentation and answer, in seconds.
    pub response_seconds: f64,
}
