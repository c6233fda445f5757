//! Dependency injection container for the difficulty controller.
//!
//! Centralizes creation and wiring of dependencies following hexagonal
//! architecture. The container owns the snapshot repository and hands out
//! agents and session orchestrators wired against it.

use std::{path::PathBuf, sync::Arc};

use super::config::{AgentConfig, SessionSettings};
use crate::{
    Result,
    adapters::JsonFileRepository,
    agents::{MonteCarloAgent, SarsaAgent, SessionAgent},
    ports::{AnswerEvaluator, ContentSource, DifficultyAgent, SessionClock, SnapshotRepository},
    reward::RewardModel,
    session::SessionOrchestrator,
    snapshot::AgentKind,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use quizdda::app::{AgentConfig, App};
/// use quizdda::snapshot::AgentKind;
///
/// let app = App::new("./dda_data");
/// let config = AgentConfig::new(AgentKind::Sarsa).with_seed(42);
/// let (agent, resumed) = app.hydrate_agent(config)?;
/// # Ok::<(), quizdda::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use quizdda::adapters::InMemorySnapshotRepository;
/// use quizdda::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemorySnapshotRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    repository: Arc<dyn SnapshotRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic).
    default_seed: Option<u64>,
}

impl App {
    /// App with production defaults: JSON snapshot files under `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(JsonFileRepository::new(directory)),
            default_seed: None,
        }
    }

    /// Builder for constructing an app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Shared handle to the snapshot repository.
    pub fn repository(&self) -> Arc<dyn SnapshotRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Build a fresh agent from configuration, without touching storage.
    pub fn create_agent(&self, config: &AgentConfig) -> Result<SessionAgent> {
        config.validate()?;
        let seed = config.seed.or(self.default_seed);
        let agent = match config.kind {
            AgentKind::Sarsa => {
                let mut agent = SarsaAgent::new(config.sarsa);
                if let Some(seed) = seed {
                    agent = agent.with_seed(seed);
                }
                SessionAgent::Sarsa(agent)
            }
            AgentKind::MonteCarlo => {
                let mut agent = MonteCarloAgent::new(config.monte_carlo);
                if let Some(seed) = seed {
                    agent = agent.with_seed(seed);
                }
                SessionAgent::MonteCarlo(agent)
            }
        };
        Ok(agent)
    }

    /// Build an agent and hydrate it from storage if a snapshot exists.
    ///
    /// Returns the agent and whether previous learned state was found. A
    /// resumed agent gets a capped exploration bump so it re-explores
    /// content it has not seen since the last session.
    pub fn hydrate_agent(&self, config: AgentConfig) -> Result<(SessionAgent, bool)> {
        let mut agent = self.create_agent(&config)?;
        match self.repository.load(config.kind) {
            Some(snapshot) => {
                agent.load_snapshot(snapshot);
                agent.on_new_stage();
                tracing::debug!(
                    agent = agent.name(),
                    pairs = agent.q_table().len(),
                    epsilon = agent.current_epsilon(),
                    "resumed agent from snapshot"
                );
                Ok((agent, true))
            }
            None => Ok((agent, false)),
        }
    }

    /// Persist an agent's learned state through the configured repository.
    pub fn save_agent(&self, agent: &SessionAgent) -> Result<()> {
        self.repository.save(agent.kind(), &agent.snapshot())
    }

    /// Wire a full session: hydrated agent, encoder, reward model and the
    /// host-provided collaborators, all against the app's repository.
    pub fn create_session<C, E, K>(
        &self,
        config: AgentConfig,
        settings: SessionSettings,
        content: C,
        evaluator: E,
        clock: K,
    ) -> Result<SessionOrchestrator<C, E, K>>
    where
        C: ContentSource,
        E: AnswerEvaluator,
        K: SessionClock,
    {
        settings.validate()?;
        let (agent, _) = self.hydrate_agent(config)?;
        SessionOrchestrator::new(
            agent,
            settings.encoder(),
            RewardModel::new(settings.reward),
            content,
            evaluator,
            clock,
            Arc::clone(&self.repository),
            settings.session,
        )
    }
}

/// Builder for constructing an app with custom dependencies.
///
/// Primarily used in tests to inject an in-memory repository and control
/// randomness.
pub struct AppBuilder {
    repository: Option<Arc<dyn SnapshotRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom snapshot repository.
    pub fn with_repository<R: SnapshotRepository + Send + Sync + 'static>(
        mut self,
        repository: R,
    ) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Default random seed for all agents created by this app.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app; defaults to JSON files in the current directory if
    /// no repository was injected.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(JsonFileRepository::new("."))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySnapshotRepository;

    fn test_app(repository: InMemorySnapshotRepository) -> App {
        App::for_testing()
            .with_repository(repository)
            .with_default_seed(42)
            .build()
    }

    #[test]
    fn test_create_agent_applies_default_seed() {
        let app = test_app(InMemorySnapshotRepository::new());
        let mut first = app
            .create_agent(&AgentConfig::new(AgentKind::Sarsa))
            .unwrap();
        let mut second = app
            .create_agent(&AgentConfig::new(AgentKind::Sarsa))
            .unwrap();

        // Same seed, same choices.
        let state = crate::state::StateKey::start();
        for _ in 0..10 {
            assert_eq!(first.choose_action(&state), second.choose_action(&state));
        }
    }

    #[test]
    fn test_create_agent_rejects_invalid_config() {
        let app = test_app(InMemorySnapshotRepository::new());
        let mut config = AgentConfig::new(AgentKind::Sarsa);
        config.sarsa.discount_factor = 1.5;
        assert!(app.create_agent(&config).is_err());
    }

    #[test]
    fn test_hydrate_agent_fresh_storage() {
        let app = test_app(InMemorySnapshotRepository::new());
        let (agent, resumed) = app.hydrate_agent(AgentConfig::new(AgentKind::Sarsa)).unwrap();
        assert!(!resumed);
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn test_hydrate_agent_resumes_saved_state() {
        let repository = InMemorySnapshotRepository::new();
        let app = test_app(repository.clone());

        let config = AgentConfig::new(AgentKind::MonteCarlo);
        let (mut agent, _) = app.hydrate_agent(config.clone()).unwrap();
        agent.set_epsilon(0.5);
        app.save_agent(&agent).unwrap();

        let (resumed_agent, resumed) = app.hydrate_agent(config).unwrap();
        assert!(resumed);
        // epsilon restored then stage-bumped within the cap
        assert!(resumed_agent.current_epsilon() >= 0.5 - 1e-12);
    }
}
