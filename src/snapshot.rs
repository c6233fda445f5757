//! Serializable snapshot of an agent's learned state.
//!
//! Agents own their serialization contract: they export an
//! [`AgentSnapshot`] and hydrate from one, and the persistence layer never
//! reaches into agent internals. One snapshot per agent kind, persisted
//! independently.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{
    q_table::{QEntry, QTable},
    state::StateKey,
    types::DifficultyLevel,
};

/// Which learner a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Sarsa,
    MonteCarlo,
}

impl AgentKind {
    /// File name for the kind's independent durable location.
    pub fn file_name(self) -> &'static str {
        match self {
            AgentKind::Sarsa => "sarsa_agent.json",
            AgentKind::MonteCarlo => "mcc_agent.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Sarsa => "SARSA",
            AgentKind::MonteCarlo => "Monte Carlo Control",
        }
    }
}

/// One persisted (state, action) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub state: String,
    /// Difficulty discriminant (0|1|2).
    pub action: u8,
    pub q_value: f64,
    pub visits: u32,
    #[serde(default)]
    pub return_count: u32,
}

/// A complete persisted agent: Q-table rows plus exploration rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub entries: Vec<SnapshotEntry>,
    pub epsilon: f64,
    pub timestamp: String,
}

impl AgentSnapshot {
    /// Capture a table and exploration rate with a fresh timestamp.
    pub fn capture(table: &QTable, epsilon: f64) -> Self {
        let entries = table
            .sorted_entries()
            .into_iter()
            .map(|(state, action, entry)| SnapshotEntry {
                state: state.into_string(),
                action: action.into(),
                q_value: entry.q_value,
                visits: entry.visits,
                return_count: entry.return_count,
            })
            .collect();

        Self {
            entries,
            epsilon,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Rebuild a Q-table from the snapshot rows.
    ///
    /// Rows with an unknown action discriminant are skipped with a warning
    /// rather than failing the whole load; a partially unreadable snapshot
    /// still warm-starts the agent.
    pub fn restore_table(&self, q_init: f64) -> QTable {
        let mut table = QTable::new(q_init);
        for row in &self.entries {
            match DifficultyLevel::try_from(row.action) {
                Ok(action) => {
                    table.insert(
                        StateKey::opaque(row.state.clone()),
                        action,
                        QEntry {
                            q_value: row.q_value,
                            visits: row.visits,
                            return_count: row.return_count,
                        },
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        state = %row.state,
                        action = row.action,
                        "skipping snapshot entry with unknown action discriminant"
                    );
                }
            }
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseTimeBucket;

    fn sample_table() -> QTable {
        let mut table = QTable::new(0.0);
        let state = StateKey::composite(DifficultyLevel::Easy, true, ResponseTimeBucket::Fast);
        let entry = table.entry_mut(&state, DifficultyLevel::Medium);
        entry.q_value = 1.25;
        entry.visits = 3;
        entry.return_count = 2;
        table
    }

    #[test]
    fn test_capture_restore_roundtrip() {
        let table = sample_table();
        let snapshot = AgentSnapshot::capture(&table, 0.12);
        let restored = snapshot.restore_table(0.0);
        assert_eq!(restored, table);
        assert_eq!(snapshot.epsilon, 0.12);
    }

    #[test]
    fn test_wire_format_field_names() {
        let snapshot = AgentSnapshot::capture(&sample_table(), 0.1);
        let json = serde_json::to_value(&snapshot).unwrap();
        let entry = &json["entries"][0];
        assert_eq!(entry["state"], "EASY_CORRECT_FAST");
        assert_eq!(entry["action"], 1);
        assert_eq!(entry["qValue"], 1.25);
        assert_eq!(entry["visits"], 3);
        assert_eq!(entry["returnCount"], 2);
        assert!(json["epsilon"].is_number());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_unknown_action_rows_are_skipped() {
        let snapshot = AgentSnapshot {
            entries: vec![
                SnapshotEntry {
                    state: "START".to_string(),
                    action: 7,
                    q_value: 1.0,
                    visits: 1,
                    return_count: 1,
                },
                SnapshotEntry {
                    state: "START".to_string(),
                    action: 0,
                    q_value: 2.0,
                    visits: 1,
                    return_count: 1,
                },
            ],
            epsilon: 0.1,
            timestamp: "2026-01-01 00:00:00".to_string(),
        };
        let table = snapshot.restore_table(0.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&StateKey::start(), DifficultyLevel::Easy), 2.0);
    }
}
