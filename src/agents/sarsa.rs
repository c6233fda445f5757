//! SARSA agent (on-policy TD control)

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

/// Parameters for a [`SarsaAgent`].
///
/// The learning rate adapts per (state, action) pair: `alpha_early` while a
/// pair has at most `early_visit_limit` visits, `alpha` afterwards, so the
/// table moves quickly on fresh pairs and stabilizes on well-visited ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarsaConfig {
    /// Learning rate for pairs visited at most `early_visit_limit` times.
    pub alpha_early: f64,
    /// Learning rate once a pair has settled.
    pub alpha: f64,
    pub early_visit_limit: u32,
    /// Discount factor γ, fixed per agent instance.
    pub discount_factor: f64,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Multiplicative decay, applied once per question.
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    /// Q-value assumed for unseen pairs (0, or a small optimistic constant).
    pub q_init: f64,
    /// Multiplier applied to epsilon on a stage transition.
    pub stage_boost: f64,
    /// Epsilon ceiling for the stage bump.
    pub stage_epsilon_cap: f64,
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self {
            alpha_early: 0.2,
            alpha: 0.1,
            early_visit_limit: 2,
            discount_factor: 0.99,
            epsilon: 0.1,
            epsilon_decay: 0.95,
            min_epsilon: 0.01,
            q_init: 0.0,
            stage_boost: 1.3,
            stage_epsilon_cap: 0.2,
        }
    }
}

impl SarsaConfig {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.alpha_early > 0.0 && self.alpha_early <= 1.0, "alpha_early must be in (0, 1]"),
            (self.alpha > 0.0 && self.alpha <= 1.0, "alpha must be in (0, 1]"),
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

/// On-policy step-wise difficulty controller.
///
/// Learns Q^π for the policy it follows, including exploration, via the
/// SARSA rule `Q(s,a) += α (r + γ Q(s',a') − Q(s,a))`. The orchestrator
/// supplies `(s', a')` from the action it actually takes next.
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    q_table: QTable,
    config: SarsaConfig,
    exploration: Exploration,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl SarsaAgent {
    pub fn new(config: SarsaConfig) -> Self {
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

    pub fn config(&self) -> &SarsaConfig {
        &self.config
    }

    /// SARSA update for one completed question.
    ///
    /// Increments the pair's visit counter before picking the learning
    /// rate, so the first updates of a fresh pair use `alpha_early`.
    /// `Q(TERMINAL, ·)` is taken as zero regardless of `next_action`.
    pub fn update_q_value(
        &mut self,
        state: &StateKey,
        action: DifficultyLevel,
        reward: f64,
        next_state: &StateKey,
        next_action: DifficultyLevel,
    ) {
        let visits = {
            let entry = self.q_table.entry_mut(state, action);
            entry.visits += 1;
            entry.visits
        };
        let alpha = if visits <= self.config.early_visit_limit {
            self.config.alpha_early
        } else {
            self.config.alpha
        };

        let next_q = if next_state.is_terminal() {
            0.0
        } else {
            self.q_table.get(next_state, next_action)
        };

        let current_q = self.q_table.get(state, action);
        let td_target = reward + self.config.discount_factor * next_q;
        let td_error = td_target - current_q;
        self.q_table.entry_mut(state, action).q_value = current_q + alpha * td_error;
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl DifficultyAgent for SarsaAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Sarsa
    }

    fn name(&self) -> &str {
        "SARSA"
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
            "SARSA stage transition"
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
