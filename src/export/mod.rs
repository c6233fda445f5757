//! Export functionality for analysis.
//!
//! Currently supports CSV export of learned Q-tables and per-session
//! metric summaries.

mod table_csv;

pub use table_csv::{MetricsSummaryRow, QTableExporter, QTableRow};
