//! Standalone collaborator implementations: question bank, exact-match
//! answer evaluation and clocks.
//!
//! Real hosts typically wire their own content pipeline and UI timers;
//! these adapters are enough for tests, simulations and headless use.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use rand::{rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    agents::build_rng,
    error::Error,
    ports::{AnswerEvaluator, ContentSource, SessionClock},
    types::{DifficultyLevel, Question},
};

/// Difficulty-partitioned question pools with uniform random selection.
#[derive(Debug)]
pub struct QuestionBank {
    pools: [Vec<Question>; 3],
    rng: StdRng,
}

impl QuestionBank {
    /// Partition a mixed question list into per-difficulty pools.
    pub fn new(questions: Vec<Question>) -> Self {
        let mut pools: [Vec<Question>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for question in questions {
            pools[question.difficulty.index()].push(question);
        }
        Self {
            pools,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn pool_size(&self, difficulty: DifficultyLevel) -> usize {
        self.pools[difficulty.index()].len()
    }
}

impl ContentSource for QuestionBank {
    fn next_question(&mut self, difficulty: DifficultyLevel) -> Result<Question> {
        self.pools[difficulty.index()]
            .choose(&mut self.rng)
            .cloned()
            .ok_or(Error::EmptyQuestionPool { difficulty })
    }
}

/// Order-sensitive exact equality of submitted answers.
///
/// Incomplete submissions are wrong; there is no partial credit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatchEvaluator;

impl AnswerEvaluator for ExactMatchEvaluator {
    fn check(&self, question: &Question, submitted: &[String]) -> bool {
        submitted.len() == question.correct_answers.len()
            && submitted
                .iter()
                .zip(&question.correct_answers)
                .all(|(given, expected)| given == expected)
    }
}

/// Wall clock backed by a monotonic [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    question_start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            question_start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock for SystemClock {
    fn start_question(&mut self) {
        self.question_start = Instant::now();
    }

    fn elapsed_since_question_start(&self) -> f64 {
        self.question_start.elapsed().as_secs_f64()
    }
}

/// Deterministic clock for tests: elapsed time is set explicitly.
///
/// Clones share the same reading, so a test can keep a handle while the
/// session owns the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the player took this long on the current question.
    pub fn set_elapsed(&self, seconds: f64) {
        *self.elapsed.lock().unwrap() = seconds;
    }
}

impl SessionClock for ManualClock {
    fn start_question(&mut self) {
        *self.elapsed.lock().unwrap() = 0.0;
    }

    fn elapsed_since_question_start(&self) -> f64 {
        *self.elapsed.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(difficulty: DifficultyLevel, answers: &[&str]) -> Question {
        Question::new(
            "which pitch?",
            difficulty,
            answers.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_bank_serves_requested_difficulty() {
        let mut bank = QuestionBank::new(vec![
            question(DifficultyLevel::Easy, &["C4"]),
            question(DifficultyLevel::Hard, &["F#5", "A3"]),
        ])
        .with_seed(1);

        let q = bank.next_question(DifficultyLevel::Hard).unwrap();
        assert_eq!(q.difficulty, DifficultyLevel::Hard);
        assert_eq!(bank.pool_size(DifficultyLevel::Medium), 0);
    }

    #[test]
    fn test_empty_pool_errors() {
        let mut bank = QuestionBank::new(vec![question(DifficultyLevel::Easy, &["C4"])]);
        let err = bank.next_question(DifficultyLevel::Medium).unwrap_err();
        assert!(matches!(err, Error::EmptyQuestionPool { difficulty: DifficultyLevel::Medium }));
    }

    #[test]
    fn test_exact_match_is_order_sensitive() {
        let evaluator = ExactMatchEvaluator;
        let q = question(DifficultyLevel::Medium, &["C4", "E4"]);

        assert!(evaluator.check(&q, &["C4".to_string(), "E4".to_string()]));
        assert!(!evaluator.check(&q, &["E4".to_string(), "C4".to_string()]));
        assert!(!evaluator.check(&q, &["C4".to_string()]));
        assert!(!evaluator.check(&q, &[]));
    }

    #[test]
    fn test_manual_clock_resets_on_new_question() {
        let mut clock = ManualClock::new();
        clock.set_elapsed(7.5);
        assert_eq!(clock.elapsed_since_question_start(), 7.5);
        clock.start_question();
        assert_eq!(clock.elapsed_since_question_start(), 0.0);
    }

    #[test]
    fn test_manual_clock_clones_share_reading() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set_elapsed(3.0);
        assert_eq!(clock.elapsed_since_question_start(), 3.0);
    }
}
