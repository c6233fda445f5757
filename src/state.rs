//! State keys and the observation-to-state encoder.
//!
//! Agents index their Q-tables by an opaque string key. The canonical key
//! is the per-question composite `"{difficulty}_{CORRECT|WRONG}_{bucket}"`;
//! a rolling-accuracy key (`"{LOW|MEDIUM|HIGH}_{bucket}"`) exists as a
//! configuration choice for hosts that prefer a coarser signal. Two
//! sentinels complete the space: `START` (no prior observation, only ever
//! used to pick the very first action) and `TERMINAL` (end of session,
//! never used to pick an action).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{AccuracyBand, DifficultyLevel, Observation, ResponseTimeBucket},
};

const START_KEY: &str = "START";
const TERMINAL_KEY: &str = "TERMINAL";

/// Opaque state key indexing a Q-table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Sentinel for "no prior observation".
    pub fn start() -> Self {
        StateKey(START_KEY.to_string())
    }

    /// Sentinel for "session over".
    pub fn terminal() -> Self {
        StateKey(TERMINAL_KEY.to_string())
    }

    /// Canonical composite key from the last answered question.
    pub fn composite(
        difficulty: DifficultyLevel,
        correct: bool,
        bucket: ResponseTimeBucket,
    ) -> Self {
        let outcome = if correct { "CORRECT" } else { "WRONG" };
        StateKey(format!("{difficulty}_{outcome}_{bucket}"))
    }

    /// Accuracy-band key for the rolling-accuracy encoder mode.
    pub fn accuracy(band: AccuracyBand, bucket: ResponseTimeBucket) -> Self {
        StateKey(format!("{band}_{bucket}"))
    }

    /// Wrap an externally produced key without interpreting it.
    pub fn opaque(key: impl Into<String>) -> Self {
        StateKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_start(&self) -> bool {
        self.0 == START_KEY
    }

    pub fn is_terminal(&self) -> bool {
        self.0 == TERMINAL_KEY
    }

    /// Typed view of the key, used by the heuristic fallback policy.
    ///
    /// Keys that match none of the known shapes come back as
    /// [`StateComponents::Opaque`]; the caller decides what to do with
    /// them, nothing here errors.
    pub fn components(&self) -> StateComponents {
        if self.is_start() {
            return StateComponents::Start;
        }
        if self.is_terminal() {
            return StateComponents::Terminal;
        }

        let parts: Vec<&str> = self.0.split('_').collect();
        match parts.as_slice() {
            [difficulty, outcome, bucket] => {
                let (Some(difficulty), Some(correct), Some(bucket)) = (
                    parse_difficulty(difficulty),
                    parse_outcome(outcome),
                    parse_bucket(bucket),
                ) else {
                    return StateComponents::Opaque;
                };
                StateComponents::Composite {
                    last_difficulty: difficulty,
                    correct,
                    bucket,
                }
            }
            [band, bucket] => {
                let (Some(band), Some(bucket)) = (parse_band(band), parse_bucket(bucket)) else {
                    return StateComponents::Opaque;
                };
                StateComponents::Accuracy { band, bucket }
            }
            _ => StateComponents::Opaque,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed shape of a [`StateKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateComponents {
    Start,
    Terminal,
    Composite {
        last_difficulty: DifficultyLevel,
        correct: bool,
        bucket: ResponseTimeBucket,
    },
    Accuracy {
        band: AccuracyBand,
        bucket: ResponseTimeBucket,
    },
    Opaque,
}

fn parse_difficulty(s: &str) -> Option<DifficultyLevel> {
    match s {
        "EASY" => Some(DifficultyLevel::Easy),
        "MEDIUM" => Some(DifficultyLevel::Medium),
        "HARD" => Some(DifficultyLevel::Hard),
        _ => None,
    }
}

fn parse_outcome(s: &str) -> Option<bool> {
    match s {
        "CORRECT" => Some(true),
        "WRONG" => Some(false),
        _ => None,
    }
}

fn parse_bucket(s: &str) -> Option<ResponseTimeBucket> {
    match s {
        "FAST" => Some(ResponseTimeBucket::Fast),
        "AVERAGE" => Some(ResponseTimeBucket::Average),
        "SLOW" => Some(ResponseTimeBucket::Slow),
        _ => None,
    }
}

fn parse_band(s: &str) -> Option<AccuracyBand> {
    match s {
        "LOW" => Some(AccuracyBand::Low),
        "MEDIUM" => Some(AccuracyBand::Medium),
        "HIGH" => Some(AccuracyBand::High),
        _ => None,
    }
}

/// Response-time discretization thresholds, in seconds.
///
/// Canonical thresholds are 5s/10s. The 3s/7s pair from earlier revisions
/// of the reward design is available via [`TimeThresholds::legacy`]; the
/// two must never be mixed within one agent's lifetime, or previously
/// learned keys stop matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeThresholds {
    /// Inclusive upper bound for `FAST`.
    pub fast_max: f64,
    /// Inclusive upper bound for `AVERAGE`; above this is `SLOW`.
    pub average_max: f64,
}

impl TimeThresholds {
    pub fn new(fast_max: f64, average_max: f64) -> Result<Self> {
        if !(fast_max.is_finite() && average_max.is_finite()) || fast_max <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("time thresholds must be finite and positive, got {fast_max}/{average_max}"),
            });
        }
        if fast_max >= average_max {
            return Err(Error::InvalidConfiguration {
                message: format!("fast threshold {fast_max} must be below average threshold {average_max}"),
            });
        }
        Ok(Self { fast_max, average_max })
    }

    /// The 3s/7s thresholds from earlier revisions.
    pub fn legacy() -> Self {
        Self {
            fast_max: 3.0,
            average_max: 7.0,
        }
    }

    pub fn bucket(&self, seconds: f64) -> ResponseTimeBucket {
        if seconds <= self.fast_max {
            ResponseTimeBucket::Fast
        } else if seconds <= self.average_max {
            ResponseTimeBucket::Average
        } else {
            ResponseTimeBucket::Slow
        }
    }
}

impl Default for TimeThresholds {
    fn default() -> Self {
        Self {
            fast_max: 5.0,
            average_max: 10.0,
        }
    }
}

/// Which state space the encoder produces keys for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EncoderMode {
    /// Per-question composite key (canonical).
    Composite,
    /// Accuracy-band key computed over a rolling window of answers;
    /// `None` means whole-session accuracy.
    RollingAccuracy { window: Option<usize> },
}

impl Default for EncoderMode {
    fn default() -> Self {
        EncoderMode::Composite
    }
}

/// Pure function from observations to state keys.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateEncoder {
    pub mode: EncoderMode,
    pub thresholds: TimeThresholds,
}

impl StateEncoder {
    pub fn new(mode: EncoderMode, thresholds: TimeThresholds) -> Self {
        Self { mode, thresholds }
    }

    /// Encode the latest observation into a state key.
    ///
    /// `accuracy` is the caller's rolling accuracy over the encoder's
    /// configured window; it is ignored in composite mode. `None` for the
    /// observation means no question has been answered yet and always
    /// yields the `START` sentinel.
    pub fn encode(&self, last: Option<&Observation>, accuracy: f64) -> StateKey {
        let Some(obs) = last else {
            return StateKey::start();
        };

        let bucket = self.thresholds.bucket(obs.response_seconds);
        match self.mode {
            EncoderMode::Composite => StateKey::composite(obs.difficulty, obs.correct, bucket),
            EncoderMode::RollingAccuracy { .. } => {
                StateKey::accuracy(AccuracyBand::from_ratio(accuracy), bucket)
            }
        }
    }

    /// Rolling window length for accuracy-keyed encoding, if any.
    pub fn accuracy_window(&self) -> Option<usize> {
        match self.mode {
            EncoderMode::Composite => None,
            EncoderMode::RollingAccuracy { window } => window,
        }
    }

    pub fn discretize_time(&self, seconds: f64) -> ResponseTimeBucket {
        self.thresholds.bucket(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(difficulty: DifficultyLevel, correct: bool, seconds: f64) -> Observation {
        Observation {
            difficulty,
            correct,
            response_seconds: seconds,
        }
    }

    #[test]
    fn test_composite_key_format() {
        let key = StateKey::composite(DifficultyLevel::Easy, true, ResponseTimeBucket::Fast);
        assert_eq!(key.as_str(), "EASY_CORRECT_FAST");

        let key = StateKey::composite(DifficultyLevel::Hard, false, ResponseTimeBucket::Slow);
        assert_eq!(key.as_str(), "HARD_WRONG_SLOW");
    }

    #[test]
    fn test_encode_without_observation_is_start() {
        let encoder = StateEncoder::default();
        assert!(encoder.encode(None, 0.0).is_start());
    }

    #[test]
    fn test_canonical_time_buckets() {
        let thresholds = TimeThresholds::default();
        assert_eq!(thresholds.bucket(0.0), ResponseTimeBucket::Fast);
        assert_eq!(thresholds.bucket(5.0), ResponseTimeBucket::Fast);
        assert_eq!(thresholds.bucket(5.01), ResponseTimeBucket::Average);
        assert_eq!(thresholds.bucket(10.0), ResponseTimeBucket::Average);
        assert_eq!(thresholds.bucket(10.01), ResponseTimeBucket::Slow);
    }

    #[test]
    fn test_legacy_thresholds() {
        let thresholds = TimeThresholds::legacy();
        assert_eq!(thresholds.bucket(3.0), ResponseTimeBucket::Fast);
        assert_eq!(thresholds.bucket(6.9), ResponseTimeBucket::Average);
        assert_eq!(thresholds.bucket(7.1), ResponseTimeBucket::Slow);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(TimeThresholds::new(5.0, 10.0).is_ok());
        assert!(TimeThresholds::new(10.0, 5.0).is_err());
        assert!(TimeThresholds::new(-1.0, 5.0).is_err());
        assert!(TimeThresholds::new(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn test_accuracy_mode_uses_band() {
        let encoder = StateEncoder::new(
            EncoderMode::RollingAccuracy { window: Some(3) },
            TimeThresholds::default(),
        );
        let key = encoder.encode(Some(&obs(DifficultyLevel::Medium, true, 4.0)), 0.8);
        assert_eq!(key.as_str(), "HIGH_FAST");

        let key = encoder.encode(Some(&obs(DifficultyLevel::Medium, false, 12.0)), 0.1);
        assert_eq!(key.as_str(), "LOW_SLOW");
    }

    #[test]
    fn test_components_roundtrip() {
        let key = StateKey::composite(DifficultyLevel::Medium, false, ResponseTimeBucket::Average);
        assert_eq!(
            key.components(),
            StateComponents::Composite {
                last_difficulty: DifficultyLevel::Medium,
                correct: false,
                bucket: ResponseTimeBucket::Average,
            }
        );

        let key = StateKey::accuracy(AccuracyBand::High, ResponseTimeBucket::Fast);
        assert_eq!(
            key.components(),
            StateComponents::Accuracy {
                band: AccuracyBand::High,
                bucket: ResponseTimeBucket::Fast,
            }
        );

        assert_eq!(StateKey::start().components(), StateComponents::Start);
        assert_eq!(StateKey::terminal().components(), StateComponents::Terminal);
        assert_eq!(
            StateKey::opaque("SOMETHING_ELSE_ENTIRELY_EXTRA").components(),
            StateComponents::Opaque
        );
    }
}
