//! Collaborator ports - content, evaluation and timing supplied by the host
//!
//! The controller never renders questions or runs timers itself; it asks
//! these traits. The adapters module ships simple implementations for
//! standalone use and tests, real hosts bring their own.

use crate::{
    Result,
    types::{DifficultyLevel, Question},
};

/// Source of questions tagged by difficulty.
pub trait ContentSource {
    /// Next question at the requested difficulty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyQuestionPool`] when no content exists
    /// at that difficulty.
    fn next_question(&mut self, difficulty: DifficultyLevel) -> Result<Question>;
}

/// Decides whether submitted answers are correct for a question.
pub trait AnswerEvaluator {
    fn check(&self, question: &Question, submitted: &[String]) -> bool;
}

/// Measures how long the player took to answer the current question.
pub trait SessionClock {
    /// Mark the moment a question is presented.
    fn start_question(&mut self);

    /// Seconds since the last `start_question` call.
    fn elapsed_since_question_start(&self) -> f64;
}
