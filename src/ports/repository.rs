//! Repository port for agent snapshot persistence.
//!
//! This module defines the trait boundary between the domain and
//! infrastructure layers for storing learned policies. Each agent kind
//! persists to its own independent location.

use crate::{
    Result,
    snapshot::{AgentKind, AgentSnapshot},
};

/// Port for persisting and loading agent snapshots.
///
/// Implementations must fail soft on load: a missing or corrupt record is
/// "no data" (`None`), never an error, so a session can always start with
/// a fresh agent. Save errors are real errors; callers decide whether to
/// surface or merely log them.
pub trait SnapshotRepository {
    /// Persist a snapshot to the kind's durable location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails. Implementations should write atomically so a crash mid-save
    /// never corrupts the previous snapshot.
    fn save(&self, kind: AgentKind, snapshot: &AgentSnapshot) -> Result<()>;

    /// Load the snapshot for an agent kind, if one exists and is readable.
    fn load(&self, kind: AgentKind) -> Option<AgentSnapshot>;
}
