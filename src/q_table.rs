//! Q-table for tabular difficulty control.

use std::collections::HashMap;

use crate::{state::StateKey, types::DifficultyLevel};

/// Tolerance when comparing Q-values for tie-breaking.
const Q_TIE_EPSILON: f64 = 1e-9;

/// Per-(state, action) learning record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QEntry {
    /// Estimated expected return.
    pub q_value: f64,
    /// Times this pair was updated (TD) or credited a first-visit return (MC).
    pub visits: u32,
    /// First-visit returns folded into `q_value`'s running mean.
    pub return_count: u32,
}

impl QEntry {
    fn with_value(q_value: f64) -> Self {
        Self {
            q_value,
            visits: 0,
            return_count: 0,
        }
    }
}

/// Q-table mapping (state, action) pairs to learning records.
///
/// Pairs never written read back as `q_init` without being inserted, so a
/// table stays empty until the first update.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    entries: HashMap<(StateKey, DifficultyLevel), QEntry>,
    q_init: f64,
}

impl QTable {
    pub fn new(q_init: f64) -> Self {
        Self {
            entries: HashMap::new(),
            q_init,
        }
    }

    /// Q-value for a pair, falling back to the initial value for unseen pairs.
    pub fn get(&self, state: &StateKey, action: DifficultyLevel) -> f64 {
        self.entries
            .get(&(state.clone(), action))
            .map_or(self.q_init, |entry| entry.q_value)
    }

    /// Full record for a pair, if it has ever been updated.
    pub fn entry(&self, state: &StateKey, action: DifficultyLevel) -> Option<&QEntry> {
        self.entries.get(&(state.clone(), action))
    }

    /// Mutable record for a pair, inserting the initial value on first touch.
    pub fn entry_mut(&mut self, state: &StateKey, action: DifficultyLevel) -> &mut QEntry {
        self.entries
            .entry((state.clone(), action))
            .or_insert_with(|| QEntry::with_value(self.q_init))
    }

    pub fn insert(&mut self, state: StateKey, action: DifficultyLevel, entry: QEntry) {
        self.entries.insert((state, action), entry);
    }

    /// Whether any action has been recorded for this state.
    pub fn has_state(&self, state: &StateKey) -> bool {
        DifficultyLevel::ALL
            .iter()
            .any(|&action| self.entries.contains_key(&(state.clone(), action)))
    }

    /// Maximum recorded Q-value in a state, or `q_init` if none recorded.
    pub fn max_q(&self, state: &StateKey) -> f64 {
        DifficultyLevel::ALL
            .iter()
            .filter_map(|&action| self.entry(state, action))
            .map(|entry| entry.q_value)
            .fold(None, |acc: Option<f64>, q| Some(acc.map_or(q, |m| m.max(q))))
            .unwrap_or(self.q_init)
    }

    /// All maximal actions among those recorded for this state.
    ///
    /// Returns an empty vector when the state has no recorded actions;
    /// the caller falls back to its heuristic in that case. Values within
    /// a small tolerance of the maximum count as tied.
    pub fn best_actions(&self, state: &StateKey) -> Vec<DifficultyLevel> {
        let recorded: Vec<(DifficultyLevel, f64)> = DifficultyLevel::ALL
            .iter()
            .filter_map(|&action| self.entry(state, action).map(|e| (action, e.q_value)))
            .collect();

        let Some(max) = recorded
            .iter()
            .map(|&(_, q)| q)
            .fold(None, |acc: Option<f64>, q| Some(acc.map_or(q, |m| m.max(q))))
        else {
            return Vec::new();
        };

        recorded
            .into_iter()
            .filter(|&(_, q)| (max - q).abs() <= Q_TIE_EPSILON)
            .map(|(action, _)| action)
            .collect()
    }

    /// Number of recorded (state, action) pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn q_init(&self) -> f64 {
        self.q_init
    }

    /// Clear all recorded pairs.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(StateKey, DifficultyLevel), &QEntry)> {
        self.entries.iter()
    }

    /// Entries sorted by state then action, for exports and snapshots.
    pub fn sorted_entries(&self) -> Vec<(StateKey, DifficultyLevel, QEntry)> {
        let mut rows: Vec<_> = self
            .entries
            .iter()
            .map(|((state, action), entry)| (state.clone(), *action, *entry))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseTimeBucket;

    fn state() -> StateKey {
        StateKey::composite(DifficultyLevel::Easy, true, ResponseTimeBucket::Fast)
    }

    #[test]
    fn test_unseen_pairs_read_init_without_insertion() {
        let table = QTable::new(0.5);
        assert_eq!(table.get(&state(), DifficultyLevel::Easy), 0.5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_entry_mut_inserts_on_first_touch() {
        let mut table = QTable::new(0.0);
        table.entry_mut(&state(), DifficultyLevel::Medium).q_value = 1.5;
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&state(), DifficultyLevel::Medium), 1.5);
        assert!(table.has_state(&state()));
    }

    #[test]
    fn test_best_actions_empty_for_unseen_state() {
        let table = QTable::new(0.0);
        assert!(table.best_actions(&state()).is_empty());
    }

    #[test]
    fn test_best_actions_single_maximum() {
        let mut table = QTable::new(0.0);
        table.entry_mut(&state(), DifficultyLevel::Easy).q_value = 0.5;
        table.entry_mut(&state(), DifficultyLevel::Medium).q_value = 1.5;
        table.entry_mut(&state(), DifficultyLevel::Hard).q_value = 0.8;
        assert_eq!(table.best_actions(&state()), vec![DifficultyLevel::Medium]);
    }

    #[test]
    fn test_best_actions_reports_ties() {
        let mut table = QTable::new(0.0);
        table.entry_mut(&state(), DifficultyLevel::Easy).q_value = 1.5;
        table.entry_mut(&state(), DifficultyLevel::Hard).q_value = 1.5;
        let best = table.best_actions(&state());
        assert_eq!(best, vec![DifficultyLevel::Easy, DifficultyLevel::Hard]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut table = QTable::new(0.0);
        table.entry_mut(&state(), DifficultyLevel::Easy).q_value = 2.0;
        table.reset();
        assert!(table.is_empty());
        assert_eq!(table.get(&state(), DifficultyLevel::Easy), 0.0);
    }

    #[test]
    fn test_sorted_entries_ordered_by_state_then_action() {
        let mut table = QTable::new(0.0);
        let other = StateKey::start();
        table.entry_mut(&state(), DifficultyLevel::Hard).q_value = 1.0;
        table.entry_mut(&state(), DifficultyLevel::Easy).q_value = 2.0;
        table.entry_mut(&other, DifficultyLevel::Medium).q_value = 3.0;

        let rows = table.sorted_entries();
        // "EASY_CORRECT_FAST" sorts before "START".
        assert_eq!(rows[0].0, state());
        assert_eq!(rows[0].1, DifficultyLevel::Easy);
        assert_eq!(rows[1].1, DifficultyLevel::Hard);
        assert_eq!(rows[2].0, other);
    }
}
