//! Per-column profile of a table: type, missing values, cardinality and a
//! numeric summary where one applies.

use serde::{Deserialize, Serialize};

use crate::stats::NumericSummary;
use crate::table::{Column, ColumnType, Table};

/// Number of most frequent values kept per column.
const TOP_VALUES: usize = 5;

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: ColumnType,
    /// Missing cells.
    pub missing: usize,
    /// Missing cells as a percentage of rows.
    pub missing_pct: f64,
    /// Distinct present values.
    pub unique: usize,
    /// Most frequent values with their counts, most frequent first.
    pub top_values: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

impl ColumnProfile {
    /// Profile a single column.
    pub fn from_column(column: &Column) -> Self {
        let rows = column.len();
        let missing = column.missing_count();

        let mut counts: Vec<(String, usize)> = column
            .value_counts()
            .into_values()
            .map(|(count, value)| (value.to_string(), count))
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let unique = counts.len();
        counts.truncate(TOP_VALUES);

        let numeric = if column.dtype().is_numeric() {
            NumericSummary::from_values(&column.numeric_values())
        } else {
            None
        };

        Self {
            name: column.name().to_string(),
            dtype: column.dtype(),
            missing,
            missing_pct: if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64 * 100.0
            },
            unique,
            top_values: counts,
            numeric,
        }
    }
}

/// Summary of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    /// Rows repeating an earlier row over every column.
    pub duplicate_rows: usize,
    pub column_profiles: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Profile every column of `table`.
    pub fn from_table(table: &Table) -> Self {
        Self {
            rows: table.row_count(),
            columns: table.column_count(),
            total_missing: table.total_missing(),
            duplicate_rows: table.duplicate_count(),
            column_profiles: table.columns().iter().map(ColumnProfile::from_column).collect(),
        }
    }

    /// Look up a column's profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_profiles.iter().find(|c| c.name == name)
    }
}
