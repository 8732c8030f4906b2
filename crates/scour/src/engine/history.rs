//! Cleaning-history records handed to whoever persists session history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one cleaning session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningRecord {
    /// `(rows, columns)` of the table the session started from.
    pub original_shape: (usize, usize),
    /// `(rows, columns)` of the cleaned table.
    pub cleaned_shape: (usize, usize),
    /// Change log joined into one line.
    pub notes: String,
    /// Individual change-log entries.
    pub changes: Vec<String>,
    /// When the record was produced.
    pub created_at: DateTime<Utc>,
}

impl CleaningRecord {
    /// Build a record from shapes and a change log.
    pub fn new(
        original_shape: (usize, usize),
        cleaned_shape: (usize, usize),
        changes: Vec<String>,
    ) -> Self {
        Self {
            original_shape,
            cleaned_shape,
            notes: changes.join(", "),
            changes,
            created_at: Utc::now(),
        }
    }

    /// Rows removed over the session.
    pub fn rows_removed(&self) -> usize {
        self.original_shape.0.saturating_sub(self.cleaned_shape.0)
    }

    /// Columns removed over the session.
    pub fn columns_removed(&self) -> usize {
        self.original_shape.1.saturating_sub(self.cleaned_shape.1)
    }
}
