//! Agent port - the surface shared by both difficulty controllers
//!
//! Learning itself stays on the concrete types (`update_q_value` for SARSA,
//! `update_policy` for Monte Carlo) because their shapes differ; everything
//! else - action selection, exploration management, snapshots - is uniform
//! and lives here.

use crate::{
    q_table::QTable,
    snapshot::{AgentKind, AgentSnapshot},
    state::StateKey,
    types::DifficultyLevel,
};

/// Common contract for difficulty-selecting agents.
///
/// # Guarantees
///
/// - `choose_action` always returns one of the three difficulty levels and
///   never errors: unseen states fall back to a deterministic heuristic.
/// - `current_epsilon` stays within `[min_epsilon, 1]`; it only increases
///   through `on_new_stage` or an explicit `set_epsilon`.
/// - `snapshot`/`load_snapshot` are the only serialization path; stores
///   never see agent internals.
pub trait DifficultyAgent: Send {
    fn kind(&self) -> AgentKind;

    /// Human-readable name for logs and exports.
    fn name(&self) -> &str;

    /// ε-greedy action for the given state.
    fn choose_action(&mut self, state: &StateKey) -> DifficultyLevel;

    /// Multiplicative epsilon decay, floored at the configured minimum.
    /// The orchestrator calls this once per question (SARSA) or once per
    /// completed episode (Monte Carlo).
    fn decay_epsilon(&mut self);

    /// Force the exploration rate, clamped to `[min_epsilon, 1]`.
    fn set_epsilon(&mut self, epsilon: f64);

    fn current_epsilon(&self) -> f64;

    /// Read-only view of the learned table.
    fn q_table(&self) -> &QTable;

    /// Clear all learned state back to constructor defaults.
    fn reset(&mut self);

    /// Stage transition: keep the table, bump exploration (capped) so the
    /// agent re-explores new content.
    fn on_new_stage(&mut self);

    /// Export learned state for persistence.
    fn snapshot(&self) -> AgentSnapshot;

    /// Hydrate learned state from a persisted snapshot. Fails soft:
    /// unreadable rows are skipped, epsilon is clamped into range.
    fn load_snapshot(&mut self, snapshot: AgentSnapshot);
}
