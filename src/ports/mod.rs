//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the domain layer and infrastructure.
//! Following hexagonal architecture, these traits are owned by the domain and
//! implemented by adapters in the infrastructure layer (or by the host game).

pub mod agent;
pub mod collaborators;
pub mod repository;

pub use agent::DifficultyAgent;
pub use collaborators::{AnswerEvaluator, ContentSource, SessionClock};
pub use repository::SnapshotRepository;
