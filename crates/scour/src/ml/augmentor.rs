//! The statistical augmentor: outlier detection, KNN imputation and cleaning
//! suggestions on top of a [`Cleaner`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{Cleaner, ColumnOutcome};
use crate::error::{Result, ScourError};
use crate::stats;
use crate::table::{ColumnType, Table};

use super::encoding::{self, Feature, LabelEncoding};
use super::isolation::IsolationForest;
use super::knn::KnnImputer;
use super::suggest::{Suggestion, SuggestionEngine};

/// Default share of rows expected to be outliers.
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Default number of neighbours used for imputation.
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Per-row outlier flags from one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierMask {
    /// Numeric columns the detector looked at.
    pub columns: Vec<String>,
    /// `true` marks a flagged row.
    pub flags: Vec<bool>,
    /// Anomaly score per row; higher is more anomalous.
    pub scores: Vec<f64>,
}

impl OutlierMask {
    /// Number of flagged rows.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Positions of the flagged rows.
    pub fn rows(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }

    /// Whether no numeric column was available to score.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// What an imputation pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputationReport {
    /// Numeric columns in the feature matrix.
    pub numeric_columns: Vec<String>,
    /// Label columns encoded into the feature matrix.
    pub encoded_columns: Vec<String>,
    /// Requested columns left out, with the reason.
    pub skipped: Vec<ColumnOutcome>,
    /// Cells filled.
    pub values_imputed: usize,
}

/// Statistical cleaning engine over a private copy of a table.
///
/// Shares its table and change log with the wrapped [`Cleaner`], so basic
/// and statistical operations can be interleaved.
#[derive(Debug, Clone)]
pub struct Augmentor {
    cleaner: Cleaner,
    seed: u64,
    n_neighbors: usize,
}

impl Augmentor {
    /// Create an augmentor over a copy of `table`.
    pub fn new(table: &Table) -> Self {
        Self::from(Cleaner::new(table))
    }

    /// Set the random seed for outlier detection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the neighbour count for imputation.
    pub fn with_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n.max(1);
        self
    }

    pub fn cleaner(&self) -> &Cleaner {
        &self.cleaner
    }

    /// The wrapped transformer, for drops, fills, renames and conversions.
    pub fn cleaner_mut(&mut self) -> &mut Cleaner {
        &mut self.cleaner
    }

    /// Changes made so far, in the order they were applied.
    pub fn changes_log(&self) -> &[String] {
        self.cleaner.changes_log()
    }

    /// The current table.
    pub fn cleaned_data(&self) -> &Table {
        self.cleaner.cleaned_data()
    }

    /// Give the current table back by value.
    pub fn into_table(self) -> Table {
        self.cleaner.into_table()
    }

    /// Score every row with an isolation forest over the numeric columns in
    /// `columns` (all numeric columns when `None`).
    ///
    /// Missing numeric cells are scored at their column mean. A table with no
    /// numeric data gives an empty mask and logs nothing.
    pub fn detect_outliers(
        &mut self,
        columns: Option<&[&str]>,
        contamination: f64,
    ) -> Result<OutlierMask> {
        let mut forest = IsolationForest::new(contamination)?.with_seed(self.seed);

        let table = self.cleaner.cleaned_data();
        let targets = numeric_targets(table, columns)?;
        let n_rows = table.row_count();

        // Columns with nothing present carry no signal.
        let features: Vec<(usize, f64)> = targets
            .into_iter()
            .filter_map(|idx| {
                stats::mean(&table.columns()[idx].numeric_values()).map(|m| (idx, m))
            })
            .collect();

        if features.is_empty() || n_rows == 0 {
            debug!(?columns, "no numeric data, outlier detection skipped");
            return Ok(OutlierMask {
                columns: Vec::new(),
                flags: vec![false; n_rows],
                scores: vec![0.0; n_rows],
            });
        }

        let matrix: Vec<Vec<f64>> = (0..n_rows)
            .map(|row| {
                features
                    .iter()
                    .map(|&(idx, mean)| table.columns()[idx].values()[row].as_f64().unwrap_or(mean))
                    .collect()
            })
            .collect();

        forest.fit(&matrix)?;
        let scores = forest.score_samples(&matrix)?;
        let flags = forest.predict(&matrix)?;

        let mask = OutlierMask {
            columns: features
                .iter()
                .map(|&(idx, _)| table.columns()[idx].name().to_string())
                .collect(),
            flags,
            scores,
        };

        debug!(
            columns = mask.columns.len(),
            threshold = ?forest.threshold(),
            "isolation forest fitted"
        );
        self.cleaner.record(format!(
            "Detected {} potential outliers using Isolation Forest",
            mask.count()
        ));
        Ok(mask)
    }

    /// Detect outliers and remove the flagged rows. Returns the number of
    /// rows removed.
    pub fn remove_outliers(&mut self, columns: Option<&[&str]>, contamination: f64) -> Result<usize> {
        let mask = self.detect_outliers(columns, contamination)?;
        let removed = mask.count();

        if removed > 0 {
            let keep: Vec<bool> = mask.flags.iter().map(|&f| !f).collect();
            self.cleaner.table_mut().retain_rows(&keep);
            self.cleaner.record(format!("Removed {} outliers", removed));
        }
        Ok(removed)
    }

    /// Fill missing values from the nearest rows.
    ///
    /// Numeric columns and low-cardinality label columns in `columns` (all
    /// columns when `None`) form the feature matrix; label columns pass
    /// through a temporary label encoding. Present values are never changed.
    /// Without numeric columns nothing happens.
    pub fn smart_impute(&mut self, columns: Option<&[&str]>) -> Result<ImputationReport> {
        let table = self.cleaner.cleaned_data();
        let targets: Vec<usize> = match columns {
            Some(names) => names
                .iter()
                .map(|n| table.require_index(n))
                .collect::<Result<_>>()?,
            None => (0..table.column_count()).collect(),
        };

        let mut report = ImputationReport::default();
        let mut numeric = Vec::new();
        let mut encoded = Vec::new();

        for idx in targets {
            let column = &table.columns()[idx];
            let dtype = column.dtype();
            if dtype.is_numeric() {
                report.numeric_columns.push(column.name().to_string());
                numeric.push(Feature::numeric(idx));
            } else if dtype.is_label() {
                match LabelEncoding::fit(column) {
                    Ok(encoding) => {
                        report.encoded_columns.push(column.name().to_string());
                        encoded.push(Feature::encoded(idx, encoding));
                    }
                    Err(err @ ScourError::EncodingOverflow { .. }) => {
                        warn!(column = column.name(), %err, "label column not encoded");
                        report
                            .skipped
                            .push(ColumnOutcome::skipped(column.name(), err.to_string()));
                    }
                    Err(err) => return Err(err),
                }
            } else {
                report.skipped.push(ColumnOutcome::skipped(
                    column.name(),
                    format!("{} columns are not imputed", dtype),
                ));
            }
        }

        if numeric.is_empty() {
            debug!("no numeric columns, imputation skipped");
            report.encoded_columns.clear();
            return Ok(report);
        }

        let features: Vec<Feature> = numeric.into_iter().chain(encoded).collect();
        if features
            .iter()
            .all(|f| !table.columns()[f.index()].has_missing())
        {
            debug!("nothing missing, imputation skipped");
            return Ok(report);
        }

        let imputer = KnnImputer::new(self.n_neighbors);
        let decoded = encoding::with_encoded(table, features, |matrix| {
            Ok(imputer.fit_transform(matrix))
        })?;

        let table = self.cleaner.table_mut();
        for column in decoded {
            report.values_imputed += column.filled;
            if column.filled > 0 {
                table
                    .column_at_mut(column.index)
                    .set_typed(column.dtype, column.values);
            }
        }

        if report.values_imputed > 0 {
            self.cleaner
                .record("Applied KNN imputation for missing values".to_string());
        }
        Ok(report)
    }

    /// Advisory suggestions for the current table. Changes nothing.
    pub fn suggest_cleaning(&self) -> Vec<Suggestion> {
        SuggestionEngine::generate(self.cleaner.cleaned_data())
    }
}

impl From<Cleaner> for Augmentor {
    fn from(cleaner: Cleaner) -> Self {
        Self {
            cleaner,
            seed: 42,
            n_neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

/// Numeric column positions among `columns`, or all numeric columns.
fn numeric_targets(table: &Table, columns: Option<&[&str]>) -> Result<Vec<usize>> {
    let candidates: Vec<usize> = match columns {
        Some(names) => names
            .iter()
            .map(|n| table.require_index(n))
            .collect::<Result<_>>()?,
        None => (0..table.column_count()).collect(),
    };

    Ok(candidates
        .into_iter()
        .filter(|&idx| {
            matches!(
                table.columns()[idx].dtype(),
                ColumnType::Integer | ColumnType::Float
            )
        })
        .collect())
}
