//! SARSA and Monte Carlo control agents
//!
//! Two interchangeable difficulty controllers sharing one action-selection
//! policy and one snapshot contract:
//!
//! - **SARSA**: on-policy TD control, learns after every question
//! - **Monte Carlo control**: first-visit return averaging, learns once per
//!   episode
//!
//! ## Usage Example
//!
//! ```
//! use quizdda::agents::{MonteCarloAgent, MonteCarloConfig, SarsaAgent, SarsaConfig};
//!
//! let sarsa = SarsaAgent::new(SarsaConfig::default()).with_seed(42);
//! let mcc = MonteCarloAgent::new(MonteCarloConfig::default()).with_seed(42);
//! ```

pub mod monte_carlo;
pub mod sarsa;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    heuristic::heuristic_action,
    ports::DifficultyAgent,
    q_table::QTable,
    snapshot::{AgentKind, AgentSnapshot},
    state::StateKey,
    types::DifficultyLevel,
};

pub use monte_carlo::{Episode, EpisodeStep, MonteCarloAgent, MonteCarloConfig};
pub use sarsa::{SarsaAgent, SarsaConfig};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// ε-greedy selection over the three difficulty levels.
///
/// With probability `epsilon` a uniformly random action; otherwise the
/// greedy action, breaking ties uniformly among maximal recorded actions.
/// A state with no recorded actions falls back to the heuristic policy
/// instead of defaulting to EASY.
pub(crate) fn epsilon_greedy(
    table: &QTable,
    state: &StateKey,
    epsilon: f64,
    rng: &mut StdRng,
) -> DifficultyLevel {
    if rng.random::<f64>() < epsilon {
        *DifficultyLevel::ALL.choose(rng).unwrap()
    } else {
        let best = table.best_actions(state);
        if best.is_empty() {
            heuristic_action(state)
        } else {
            *best.choose(rng).unwrap()
        }
    }
}

/// Exploration parameters shared by both agent kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Exploration {
    pub epsilon: f64,
    pub initial_epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    pub stage_boost: f64,
    pub stage_epsilon_cap: f64,
}

impl Exploration {
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }

    pub fn set(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(self.min_epsilon, 1.0);
    }

    /// Stage-transition bump: multiplicative boost toward the cap, never a
    /// decrease for agents already exploring above it.
    pub fn stage_bump(&mut self) {
        if self.epsilon < self.stage_epsilon_cap {
            self.epsilon = (self.epsilon * self.stage_boost).min(self.stage_epsilon_cap);
        }
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

/// Active learner for a session, dispatching to the concrete agent.
///
/// The orchestrator needs mode-specific learning calls (step-wise TD vs
/// batched episodes), so it holds this enum rather than a trait object.
#[derive(Debug, Clone)]
pub enum SessionAgent {
    Sarsa(SarsaAgent),
    MonteCarlo(MonteCarloAgent),
}

impl SessionAgent {
    pub fn kind(&self) -> AgentKind {
        match self {
            SessionAgent::Sarsa(_) => AgentKind::Sarsa,
            SessionAgent::MonteCarlo(_) => AgentKind::MonteCarlo,
        }
    }
}

impl DifficultyAgent for SessionAgent {
    fn kind(&self) -> AgentKind {
        SessionAgent::kind(self)
    }

    fn name(&self) -> &str {
        match self {
            SessionAgent::Sarsa(agent) => agent.name(),
            SessionAgent::MonteCarlo(agent) => agent.name(),
        }
    }

    fn choose_action(&mut self, state: &StateKey) -> DifficultyLevel {
        match self {
            SessionAgent::Sarsa(agent) => agent.choose_action(state),
            SessionAgent::MonteCarlo(agent) => agent.choose_action(state),
        }
    }

    fn decay_epsilon(&mut self) {
        match self {
            SessionAgent::Sarsa(agent) => agent.decay_epsilon(),
            SessionAgent::MonteCarlo(agent) => agent.decay_epsilon(),
        }
    }

    fn set_epsilon(&mut self, epsilon: f64) {
        match self {
            SessionAgent::Sarsa(agent) => agent.set_epsilon(epsilon),
            SessionAgent::MonteCarlo(agent) => agent.set_epsilon(epsilon),
        }
    }

    fn current_epsilon(&self) -> f64 {
        match self {
            SessionAgent::Sarsa(agent) => agent.current_epsilon(),
            SessionAgent::MonteCarlo(agent) => agent.current_epsilon(),
        }
    }

    fn q_table(&self) -> &QTable {
        match self {
            SessionAgent::Sarsa(agent) => agent.q_table(),
            SessionAgent::MonteCarlo(agent) => agent.q_table(),
        }
    }

    fn reset(&mut self) {
        match self {
            SessionAgent::Sarsa(agent) => agent.reset(),
            SessionAgent::MonteCarlo(agent) => agent.reset(),
        }
    }

    fn on_new_stage(&mut self) {
        match self {
            SessionAgent::Sarsa(agent) => agent.on_new_stage(),
            SessionAgent::MonteCarlo(agent) => agent.on_new_stage(),
        }
    }

    fn snapshot(&self) -> AgentSnapshot {
        match self {
            SessionAgent::Sarsa(agent) => agent.snapshot(),
            SessionAgent::MonteCarlo(agent) => agent.snapshot(),
        }
    }

    fn load_snapshot(&mut self, snapshot: AgentSnapshot) {
        match self {
            SessionAgent::Sarsa(agent) => agent.load_snapshot(snapshot),
            SessionAgent::MonteCarlo(agent) => agent.load_snapshot(snapshot),
        }
    }
}
