//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod content;
pub mod in_memory_repository;
pub mod json_repository;

pub use content::{ExactMatchEvaluator, ManualClock, QuestionBank, SystemClock};
pub use in_memory_repository::InMemorySnapshotRepository;
pub use json_repository::JsonFileRepository;
