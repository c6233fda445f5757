//! In-memory snapshot repository for testing.
//!
//! Stores snapshots in a shared map keyed by agent kind, avoiding file
//! system I/O entirely. Clones share the same underlying storage, so a
//! test can hand the repository to an orchestrator and still inspect what
//! was saved.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    Result,
    ports::SnapshotRepository,
    snapshot::{AgentKind, AgentSnapshot},
};

/// Thread-safe in-memory repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotRepository {
    storage: Arc<Mutex<HashMap<AgentKind, AgentSnapshot>>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    pub fn contains(&self, kind: AgentKind) -> bool {
        self.storage.lock().unwrap().contains_key(&kind)
    }

    /// Drop all stored snapshots.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, kind: AgentKind, snapshot: &AgentSnapshot) -> Result<()> {
        self.storage.lock().unwrap().insert(kind, snapshot.clone());
        Ok(())
    }

    fn load(&self, kind: AgentKind) -> Option<AgentSnapshot> {
        self.storage.lock().unwrap().get(&kind).cloned()
    }
}
