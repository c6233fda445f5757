//! Common test utilities: simulated players and session wiring.
//!
//! The simulated players model archetypes with fixed per-difficulty
//! accuracy and response-time ranges, so whole sessions can be driven
//! deterministically from a seed.

use quizdda::{
    DifficultyLevel, Question, TurnReport,
    adapters::{ExactMatchEvaluator, ManualClock, QuestionBank},
    session::SessionOrchestrator,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Per-difficulty behavior of a simulated player.
#[derive(Debug, Clone, Copy)]
pub struct PlayerProfile {
    /// Probability of answering correctly at easy/medium/hard.
    pub accuracy: [f64; 3],
    /// Uniform response-time range in seconds.
    pub response_range: (f64, f64),
}

/// Answers everything correctly and quickly.
pub fn perfect_player() -> PlayerProfile {
    PlayerProfile {
        accuracy: [1.0, 1.0, 1.0],
        response_range: (1.0, 4.0),
    }
}

/// Reliable on easy content, shaky on hard.
pub fn average_player() -> PlayerProfile {
    PlayerProfile {
        accuracy: [0.9, 0.6, 0.35],
        response_range: (3.0, 9.0),
    }
}

/// Mostly wrong and slow, even on easy content.
pub fn struggling_player() -> PlayerProfile {
    PlayerProfile {
        accuracy: [0.4, 0.2, 0.05],
        response_range: (8.0, 15.0),
    }
}

/// A player that answers questions according to a [`PlayerProfile`].
pub struct SimulatedPlayer {
    profile: PlayerProfile,
    rng: StdRng,
}

impl SimulatedPlayer {
    pub fn new(profile: PlayerProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce submitted answers and a response time for one question.
    pub fn respond(&mut self, question: &Question) -> (Vec<String>, f64) {
        let p = self.profile.accuracy[question.difficulty.index()];
        let correct = self.rng.random::<f64>() < p;
        let answers = if correct {
            question.correct_answers.clone()
        } else {
            vec!["WRONG_NOTE".to_string()]
        };
        let (lo, hi) = self.profile.response_range;
        let seconds = self.rng.random_range(lo..hi);
        (answers, seconds)
    }
}

/// A bank with several questions per difficulty, all answerable.
pub fn question_bank(seed: u64) -> QuestionBank {
    let mut questions = Vec::new();
    for difficulty in DifficultyLevel::ALL {
        for i in 0..6 {
            questions.push(Question::new(
                format!("identify pitch {difficulty} #{i}"),
                difficulty,
                vec![format!("{difficulty}-{i}")],
            ));
        }
    }
    QuestionBank::new(questions).with_seed(seed)
}

/// Drive a session to completion with a simulated player.
///
/// Returns every turn report in order; the last one has
/// `session_finished` set.
pub fn drive_session(
    session: &mut SessionOrchestrator<QuestionBank, ExactMatchEvaluator, ManualClock>,
    clock: &ManualClock,
    player: &mut SimulatedPlayer,
) -> Vec<TurnReport> {
    let mut reports = Vec::new();
    loop {
        let question = session.next_question().unwrap().clone();
        let (answers, seconds) = player.respond(&question);
        clock.set_elapsed(seconds);
        let report = session.submit_answers(&answers).unwrap();
        let finished = report.session_finished;
        reports.push(report);
        if finished {
            return reports;
        }
    }
}
