//! In-memory tabular data.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::Keep;
use crate::error::{Result, ScourError};

use super::column::Column;
use super::value::{Value, ValueKey};

/// An ordered set of uniquely named, equal-length columns.
///
/// The row count is held separately so a table keeps its rows after the
/// last column is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create a table from columns.
    ///
    /// Fails if two columns share a name or the columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(ScourError::DuplicateColumn(column.name().to_string()));
            }
        }

        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(ScourError::ShapeMismatch {
                column: bad.name().to_string(),
                expected: n_rows,
                actual: bad.len(),
            });
        }

        Ok(Self { columns, n_rows })
    }

    /// Build a table from headers and row-major values, inferring column types.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<Value>>) -> Result<Self> {
        let row_count = rows.len();
        let mut buckets: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(ScourError::ShapeMismatch {
                    column: format!("row {}", row_idx),
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (bucket, value) in buckets.iter_mut().zip(row) {
                bucket.push(value);
            }
        }

        let columns = headers
            .iter()
            .zip(buckets)
            .map(|(name, values)| Column::infer(*name, values))
            .collect();

        let mut table = Self::new(columns)?;
        table.n_rows = row_count;
        Ok(table)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Position of a column, or `ColumnNotFound`.
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ScourError::ColumnNotFound(name.to_string()))
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// Values of one row in column order.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().filter_map(|c| c.get(row)).collect())
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).filter_map(move |r| self.row(r))
    }

    /// Names of integer and float columns.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .map(Column::name)
            .collect()
    }

    /// Missing-value count per column, in column order.
    pub fn missing_counts(&self) -> IndexMap<String, usize> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.missing_count()))
            .collect()
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Comparison key for one row over the given column positions.
    pub fn row_key(&self, row: usize, columns: &[usize]) -> Vec<ValueKey> {
        columns
            .iter()
            .map(|&c| {
                self.get(row, c)
                    .map(Value::key)
                    .unwrap_or(ValueKey::Missing)
            })
            .collect()
    }

    /// Mark rows that duplicate another row over `columns`.
    ///
    /// With `Keep::First` every occurrence but the first is marked, with
    /// `Keep::Last` every occurrence but the last, and with `Keep::None` every
    /// occurrence of a repeated key. Missing values compare equal. With no
    /// columns there is nothing to compare and no row is marked.
    pub fn duplicated(&self, columns: &[usize], keep: Keep) -> Vec<bool> {
        let n = self.row_count();
        if columns.is_empty() {
            return vec![false; n];
        }
        let keys: Vec<Vec<ValueKey>> = (0..n).map(|r| self.row_key(r, columns)).collect();
        let mut mask = vec![false; n];

        match keep {
            Keep::First => {
                let mut seen = HashSet::new();
                for (row, key) in keys.iter().enumerate() {
                    mask[row] = !seen.insert(key);
                }
            }
            Keep::Last => {
                let mut seen = HashSet::new();
                for (row, key) in keys.iter().enumerate().rev() {
                    mask[row] = !seen.insert(key);
                }
            }
            Keep::None => {
                let mut counts: HashMap<&Vec<ValueKey>, usize> = HashMap::new();
                for key in &keys {
                    *counts.entry(key).or_insert(0) += 1;
                }
                for (row, key) in keys.iter().enumerate() {
                    mask[row] = counts.get(key).copied().unwrap_or(0) > 1;
                }
            }
        }

        mask
    }

    /// Number of rows that repeat an earlier row over all columns.
    pub fn duplicate_count(&self) -> usize {
        let all: Vec<usize> = (0..self.column_count()).collect();
        self.duplicated(&all, Keep::First)
            .into_iter()
            .filter(|&d| d)
            .count()
    }

    pub(crate) fn column_at_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    pub(crate) fn remove_columns(&mut self, names: &[&str]) {
        self.columns.retain(|c| !names.contains(&c.name()));
    }

    /// Keep only the rows whose mask entry is true.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            column.retain_rows(keep);
        }
        self.n_rows = (0..self.n_rows)
            .filter(|&row| keep.get(row).copied().unwrap_or(true))
            .count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "name"],
            vec![
                vec![1.into(), "a".into()],
                vec![2.into(), "b".into()],
                vec![1.into(), "a".into()],
                vec![3.into(), Value::Missing],
                vec![3.into(), Value::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let a = Column::infer("x", vec![1.into()]);
        let b = Column::infer("x", vec![2.into()]);
        assert!(matches!(
            Table::new(vec![a, b]),
            Err(ScourError::DuplicateColumn(name)) if name == "x"
        ));
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let a = Column::infer("x", vec![1.into(), 2.into()]);
        let b = Column::infer("y", vec![2.into()]);
        assert!(matches!(
            Table::new(vec![a, b]),
            Err(ScourError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicated_keep_policies() {
        let table = sample();
        let all = [0, 1];
        assert_eq!(
            table.duplicated(&all, Keep::First),
            vec![false, false, true, false, true]
        );
        assert_eq!(
            table.duplicated(&all, Keep::Last),
            vec![true, false, false, true, false]
        );
        assert_eq!(
            table.duplicated(&all, Keep::None),
            vec![true, false, true, true, true]
        );
    }

    #[test]
    fn test_rows_survive_removing_every_column() {
        let mut table = sample();
        table.remove_columns(&["id", "name"]);
        assert_eq!(table.shape(), (5, 0));
        assert_eq!(table.rows().count(), 5);
        assert_eq!(table.duplicated(&[], Keep::First), vec![false; 5]);

        table.retain_rows(&[true, false, true, false, false]);
        assert_eq!(table.shape(), (2, 0));
    }

    #[test]
    fn test_from_rows_without_headers_keeps_row_count() {
        let table = Table::from_rows(&[], vec![vec![], vec![]]).unwrap();
        assert_eq!(table.shape(), (2, 0));
    }

    #[test]
    fn test_shape_and_missing() {
        let table = sample();
        assert_eq!(table.shape(), (5, 2));
        assert_eq!(table.total_missing(), 2);
        assert_eq!(table.numeric_columns(), vec!["id"]);
        assert_eq!(table.duplicate_count(), 2);
    }
}
