//! Application layer with dependency injection container.
//!
//! Follows hexagonal architecture: the container owns the infrastructure
//! side (the snapshot repository) and provides factory methods for agents
//! and session orchestrators. Domain logic never constructs its own
//! storage.
//!
//! # Usage
//!
//! ## Production
//!
//! ```no_run
//! use quizdda::app::{AgentConfig, App};
//! use quizdda::snapshot::AgentKind;
//!
//! let app = App::new("./dda_data");
//! let config = AgentConfig::new(AgentKind::MonteCarlo).with_seed(42);
//! let (agent, resumed) = app.hydrate_agent(config)?;
//! # Ok::<(), quizdda::Error>(())
//! ```
//!
//! ## Testing
//!
//! ```
//! use quizdda::adapters::InMemorySnapshotRepository;
//! use quizdda::app::App;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemorySnapshotRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, SessionSettings};
pub use container::{App, AppBuilder};
