//! Configuration types for agent and session creation.

use crate::{
    Result,
    agents::{MonteCarloConfig, SarsaConfig},
    reward::RewardConfig,
    session::SessionConfig,
    snapshot::AgentKind,
    state::{EncoderMode, StateEncoder, TimeThresholds},
};

/// Configuration for creating a difficulty agent.
///
/// Carries the parameter sets for both agent kinds; only the one matching
/// `kind` is consulted at creation time.
///
/// # Examples
///
/// ```
/// use quizdda::app::AgentConfig;
/// use quizdda::snapshot::AgentKind;
///
/// let config = AgentConfig::new(AgentKind::Sarsa).with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Which learning algorithm backs the agent.
    pub kind: AgentKind,
    /// Parameters used when `kind` is [`AgentKind::Sarsa`].
    pub sarsa: SarsaConfig,
    /// Parameters used when `kind` is [`AgentKind::MonteCarlo`].
    pub monte_carlo: MonteCarloConfig,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Configuration with algorithm defaults and no seed.
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            sarsa: SarsaConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            seed: None,
        }
    }

    pub fn with_sarsa(mut self, config: SarsaConfig) -> Self {
        self.sarsa = config;
        self
    }

    pub fn with_monte_carlo(mut self, config: MonteCarloConfig) -> Self {
        self.monte_carlo = config;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the parameter set for the selected kind.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            AgentKind::Sarsa => self.sarsa.validate(),
            AgentKind::MonteCarlo => self.monte_carlo.validate(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(AgentKind::Sarsa)
    }
}

/// Everything a session needs besides the agent and the collaborators.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Question budget and episode layout.
    pub session: SessionConfig,
    /// How observations are discretized into state keys.
    pub encoder_mode: EncoderMode,
    /// Response-time bucket boundaries.
    pub thresholds: TimeThresholds,
    /// Reward shaping parameters.
    pub reward: RewardConfig,
}

impl SessionSettings {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session,
            encoder_mode: EncoderMode::Composite,
            thresholds: TimeThresholds::default(),
            reward: RewardConfig::default(),
        }
    }

    pub fn with_encoder_mode(mut self, mode: EncoderMode) -> Self {
        self.encoder_mode = mode;
        self
    }

    /// Sets the bucket boundaries for both the state encoder and the
    /// reward bonus, so FAST means the same thing in both places.
    pub fn with_thresholds(mut self, thresholds: TimeThresholds) -> Self {
        self.thresholds = thresholds;
        self.reward.thresholds = thresholds;
        self
    }

    pub fn with_reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.reward.validate()
    }

    pub(crate) fn encoder(&self) -> StateEncoder {
        StateEncoder::new(self.encoder_mode, self.thresholds)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
