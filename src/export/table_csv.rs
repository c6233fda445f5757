//! CSV export of learned Q-tables and session metric summaries.
//!
//! The Q-table export is the analysis companion to the JSON snapshot: one
//! row per visited (state, action) pair, sorted by state then action so
//! diffs between sessions are readable.

use std::{io::Write, path::Path};

use serde::Serialize;

use crate::{
    Result, metrics::SessionMetrics, q_table::QTable, types::DifficultyLevel,
};

/// One visited (state, action) pair.
#[derive(Debug, Clone, Serialize)]
pub struct QTableRow {
    pub state: String,
    pub action: u8,
    pub difficulty: String,
    pub q_value: f64,
    pub visits: u32,
    pub return_count: u32,
}

/// One-line summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummaryRow {
    pub questions_answered: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub mean_response_seconds: f64,
    pub easy_accuracy: f64,
    pub medium_accuracy: f64,
    pub hard_accuracy: f64,
}

impl MetricsSummaryRow {
    pub fn from_metrics(metrics: &SessionMetrics) -> Self {
        Self {
            questions_answered: metrics.questions_answered(),
            correct: metrics.correct_count(),
            accuracy: metrics.total_accuracy(),
            mean_response_seconds: metrics.mean_response_seconds(),
            easy_accuracy: metrics.accuracy_for(DifficultyLevel::Easy),
            medium_accuracy: metrics.accuracy_for(DifficultyLevel::Medium),
            hard_accuracy: metrics.accuracy_for(DifficultyLevel::Hard),
        }
    }
}

/// Exporter for Q-table and metrics CSV files.
pub struct QTableExporter;

impl QTableExporter {
    /// Export a Q-table to a CSV file, one row per visited pair.
    ///
    /// Returns the number of rows written.
    pub fn export_table(table: &QTable, path: &Path) -> Result<usize> {
        let mut writer = csv::Writer::from_path(path)?;
        let count = Self::write_table(table, &mut writer)?;
        writer.flush()?;
        Ok(count)
    }

    /// Export a session metrics summary to a CSV file.
    pub fn export_metrics(metrics: &SessionMetrics, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.serialize(MetricsSummaryRow::from_metrics(metrics))?;
        writer.flush()?;
        Ok(())
    }

    /// Write Q-table rows into an existing CSV writer.
    pub fn write_table<W: Write>(table: &QTable, writer: &mut csv::Writer<W>) -> Result<usize> {
        let rows = table.sorted_entries();
        let count = rows.len();
        for (state, action, entry) in rows {
            writer.serialize(QTableRow {
                state: state.into_string(),
                action: action.into(),
                difficulty: action.to_string(),
                q_value: entry.q_value,
                visits: entry.visits,
                return_count: entry.return_count,
            })?;
        }
        Ok(count)
    }
}
