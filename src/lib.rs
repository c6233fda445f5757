//! Adaptive difficulty controller for quiz-style sessions.
//!
//! This crate provides:
//! - Two tabular reinforcement learning agents over a shared Q-table:
//!   SARSA (per-question TD updates) and first-visit Monte Carlo control
//!   (episode-batch updates)
//! - Epsilon-greedy exploration with decay, seeded tie-breaking and a
//!   heuristic fallback for unseen states
//! - A session orchestrator driving the action/observe/learn turn loop
//! - Crash-safe JSON snapshot persistence and CSV export for analysis
//!
//! The host supplies questions, answer checking and timing through the
//! collaborator ports; the controller owns state encoding, reward shaping,
//! learning and persistence.

pub mod adapters;
pub mod agents;
pub mod app;
pub mod error;
pub mod export;
pub mod heuristic;
pub mod metrics;
pub mod ports;
pub mod q_table;
pub mod reward;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod types;

pub use agents::{
    Episode, EpisodeStep, MonteCarloAgent, MonteCarloConfig, SarsaAgent, SarsaConfig, SessionAgent,
};
pub use error::{Error, Result};
pub use export::QTableExporter;
pub use metrics::SessionMetrics;
pub use ports::{
    AnswerEvaluator, ContentSource, DifficultyAgent, SessionClock, SnapshotRepository,
};
pub use q_table::{QEntry, QTable};
pub use reward::{PenaltyTable, RewardConfig, RewardModel};
pub use session::{Phase, SessionConfig, SessionOrchestrator, TurnReport};
pub use snapshot::{AgentKind, AgentSnapshot};
pub use state::{EncoderMode, StateEncoder, StateKey, TimeThresholds};
pub use types::{AccuracyBand, DifficultyLevel, Observation, Question, ResponseTimeBucket};
