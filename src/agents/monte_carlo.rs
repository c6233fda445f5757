//! Monte Carlo control agent (first-visit, episodic)

use std::collections::HashMap;

use rand::rngs::StdRng;

use crate::{
    agents::{Exploration, build_rng, epsilon_greedy},
    error::{Error, Result},
    ports::DifficultyAgent,
    q_table::QTable,
    snapshot::{AgentKind, AgentSnapshot},
    state::StateKey,
    types::DifficultyLevel,
};

/// One (state, action, reward) step of an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStep {
    pub state: StateKey,
    pub action: DifficultyLevel,
    pub reward: f64,
}

impl EpisodeStep {
    pub fn new(state: StateKey, action: DifficultyLevel, reward: f64) -> Self {
        Self {
            state,
            action,
            reward,
        }
    }
}

/// Ordered steps of one fixed-length batch of questions. Consumed exactly
/// once by [`MonteCarloAgent::update_policy`], then discarded.
pub type Episode = Vec<EpisodeStep>;

/// Parameters for a [`MonteCarloAgent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloConfig {
    /// Discount factor γ, fixed per agent instance.
    pub discount_factor: f64,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Multiplicative decay, applied once per completed episode.
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    /// Q-value assumed for unseen pairs.
    pub q_init: f64,
    /// Multiplier applied to epsilon on a stage transition.
    pub stage_boost: f64,
    /// Epsilon ceiling for the stage bump.
    pub stage_epsilon_cap: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.95,
            epsilon: 0.15,
            epsilon_decay: 0.95,
            min_epsilon: 0.05,
            q_init: 0.0,
            stage_boost: 1.3,
            stage_epsilon_cap: 0.2,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (
                self.discount_factor > 0.0 && self.discount_factor < 1.0,
                "discount factor must be in (0, 1)",
            ),
            (
                self.min_epsilon > 0.0 && self.min_epsilon <= 1.0,
                "min_epsilon must be in (0, 1]",
            ),
            (
                self.epsilon >= self.min_epsilon && self.epsilon <= 1.0,
                "epsilon must be in [min_epsilon, 1]",
            ),
            (
                self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
                "epsilon_decay must be in (0, 1]",
            ),
            (self.stage_boost >= 1.0, "stage_boost must be at least 1"),
            (self.q_init.is_finite(), "q_init must be finite"),
        ];
        for (ok, message) in checks {
            if !ok {
                return Err(Error::InvalidConfiguration {
                    message: message.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Episodic difficulty controller using first-visit Monte Carlo control.
///
/// `Q(s,a)` is always the arithmetic mean of every first-visit return
/// recorded for the pair since construction or the last `reset()`. The
/// mean is kept incrementally through `return_count`, so it survives a
/// snapshot round-trip: a warm-started agent keeps averaging into the
/// returns it accumulated in earlier sessions.
#[derive(Debug, Clone)]
pub struct MonteCarloAgent {
    q_table: QTable,
    config: MonteCarloConfig,
    exploration: Exploration,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl MonteCarloAgent {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self {
            q_table: QTable::new(config.q_init),
            exploration: Exploration {
                epsilon: config.epsilon,
                initial_epsilon: config.epsilon,
                epsilon_decay: config.epsilon_decay,
                min_epsilon: config.min_epsilon,
                stage_boost: config.stage_boost,
                stage_epsilon_cap: config.stage_epsilon_cap,
            },
            config,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Fold a completed episode into the Q-table.
    ///
    /// Walks the episode backward accumulating the discounted return
    /// `G ← r + γ·G`. When a (state, action) pair repeats within the
    /// episode, only its earliest time index is credited — that occurrence
    /// is the last one met walking backward, so later backward encounters
    /// simply overwrite the pending return before anything is committed.
    /// An empty episode is a logged no-op; the table is untouched.
    pub fn update_policy(&mut self, episode: &[EpisodeStep]) {
        if episode.is_empty() {
            tracing::warn!("empty episode, no policy update performed");
            return;
        }

        let mut g = 0.0;
        let mut first_visit_returns: HashMap<(StateKey, DifficultyLevel), f64> = HashMap::new();
        for step in episode.iter().rev() {
            g = step.reward + self.config.discount_factor * g;
            first_visit_returns.insert((step.state.clone(), step.action), g);
        }

        for ((state, action), first_return) in first_visit_returns {
            let entry = self.q_table.entry_mut(&state, action);
            entry.return_count += 1;
            entry.visits += 1;
            entry.q_value += (first_return - entry.q_value) / f64::from(entry.return_count);
            tracing::debug!(
                state = %state,
                ?action,
                first_return,
                q_value = entry.q_value,
                returns = entry.return_count,
                "first-visit return recorded"
            );
        }
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl DifficultyAgent for MonteCarloAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::MonteCarlo
    }

    fn name(&self) -> &str {
        "Monte Carlo Control"
    }

    fn choose_action(&mut self, state: &StateKey) -> DifficultyLevel {
        epsilon_greedy(&self.q_table, state, self.exploration.epsilon, &mut self.rng)
    }

    fn decay_epsilon(&mut self) {
        self.exploration.decay();
    }

    fn set_epsilon(&mut self, epsilon: f64) {
        self.exploration.set(epsilon);
    }

    fn current_epsilon(&self) -> f64 {
        self.exploration.epsilon
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn reset(&mut self) {
        self.q_table.reset();
        self.exploration.reset();
        self.reset_rng();
    }

    fn on_new_stage(&mut self) {
        self.exploration.stage_bump();
        tracing::debug!(
            entries = self.q_table.len(),
            epsilon = self.exploration.epsilon,
            "Monte Carlo stage transition"
        );
    }

    fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::capture(&self.q_table, self.exploration.epsilon)
    }

    fn load_snapshot(&mut self, snapshot: AgentSnapshot) {
        self.q_table = snapshot.restore_table(self.config.q_init);
        self.exploration.set(snapshot.epsilon);
    }
}
