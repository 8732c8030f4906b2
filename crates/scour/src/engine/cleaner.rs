//! The table transformer: owns a table, applies cleaning operations to it and
//! records what each one did.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{Result, ScourError};
use crate::stats;
use crate::table::{Column, ColumnType, Table, Value};

use super::history::CleaningRecord;
use super::operations::{ColumnOutcome, FillMethod, Keep, MissingStrategy};

/// Engine for applying cleaning operations to a private copy of a table.
///
/// Every operation that changes the table appends one entry to the change
/// log. Operations that change nothing leave the log alone.
#[derive(Debug, Clone)]
pub struct Cleaner {
    table: Table,
    log: Vec<String>,
}

impl Cleaner {
    /// Create a cleaner over a copy of `table`. The caller's table is never
    /// touched.
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            log: Vec::new(),
        }
    }

    /// Changes made so far, in the order they were applied.
    pub fn changes_log(&self) -> &[String] {
        &self.log
    }

    /// The current table.
    pub fn cleaned_data(&self) -> &Table {
        &self.table
    }

    /// Give the current table back by value.
    pub fn into_table(self) -> Table {
        self.table
    }

    /// Summarize this session against the table it started from.
    pub fn history(&self, original: &Table) -> CleaningRecord {
        CleaningRecord::new(original.shape(), self.table.shape(), self.log.clone())
    }

    pub(crate) fn record(&mut self, entry: String) {
        info!(change = %entry, "table updated");
        self.log.push(entry);
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Drop one column if it exists.
    pub fn drop_column(&mut self, name: &str) -> ColumnOutcome {
        self.drop_columns(&[name])
            .pop()
            .unwrap_or_else(|| ColumnOutcome::skipped(name, "no column requested"))
    }

    /// Drop the named columns.
    ///
    /// Names that are not in the table are skipped, never an error.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<ColumnOutcome> {
        let mut matched: Vec<&str> = Vec::new();
        let mut outcomes = Vec::with_capacity(names.len());

        for name in names.iter().map(AsRef::as_ref) {
            if self.table.column_index(name).is_none() {
                debug!(column = name, "drop skipped, column not present");
                outcomes.push(ColumnOutcome::skipped(name, "column not found"));
            } else if matched.contains(&name) {
                outcomes.push(ColumnOutcome::skipped(name, "already dropped"));
            } else {
                matched.push(name);
                outcomes.push(ColumnOutcome::applied(name));
            }
        }

        if !matched.is_empty() {
            self.table.remove_columns(&matched);
            self.record(format!("Dropped columns: {}", matched.join(", ")));
        }

        outcomes
    }

    /// Drop or fill missing values in `columns` (all columns when `None`).
    ///
    /// Returns the number of rows removed or values filled. Unknown columns
    /// and fills that cannot apply are rejected before anything changes.
    pub fn handle_missing(
        &mut self,
        strategy: &MissingStrategy,
        columns: Option<&[&str]>,
    ) -> Result<usize> {
        let targets = self.resolve_columns(columns)?;
        debug!(?strategy, columns = targets.len(), "handling missing values");

        match strategy {
            MissingStrategy::Drop => Ok(self.drop_missing_rows(&targets)),
            MissingStrategy::Fill(FillMethod::Constant(value)) => {
                self.fill_constant(&targets, value)
            }
            MissingStrategy::Fill(method) => self.fill_computed(&targets, method),
        }
    }

    fn resolve_columns(&self, columns: Option<&[&str]>) -> Result<Vec<usize>> {
        match columns {
            Some(names) => names.iter().map(|n| self.table.require_index(n)).collect(),
            None => Ok((0..self.table.column_count()).collect()),
        }
    }

    fn drop_missing_rows(&mut self, targets: &[usize]) -> usize {
        let columns = self.table.columns();
        let keep: Vec<bool> = (0..self.table.row_count())
            .map(|row| {
                targets
                    .iter()
                    .all(|&c| !columns[c].values()[row].is_missing())
            })
            .collect();

        let removed = keep.iter().filter(|&&k| !k).count();
        if removed > 0 {
            self.table.retain_rows(&keep);
            self.record(format!("Dropped {} rows with missing values", removed));
        }
        removed
    }

    fn fill_constant(&mut self, targets: &[usize], value: &Value) -> Result<usize> {
        if value.is_missing() {
            return Err(ScourError::InvalidParameter(
                "fill value must not be missing".to_string(),
            ));
        }

        // Check every column first so a bad fill changes nothing.
        let mut plans = Vec::new();
        for &idx in targets {
            let column = &self.table.columns()[idx];
            if column.has_missing() {
                plans.push((idx, fill_value_for(column, value)?));
            }
        }

        let mut filled = 0;
        for (idx, (fill, promote)) in plans {
            let column = self.table.column_at_mut(idx);
            if promote {
                column.promote_to_float();
            }
            filled += fill_missing(column, &fill);
        }

        if filled > 0 {
            self.record(format!("Filled missing values with {}", value));
        }
        Ok(filled)
    }

    fn fill_computed(&mut self, targets: &[usize], method: &FillMethod) -> Result<usize> {
        if matches!(method, FillMethod::Mean | FillMethod::Median) {
            for &idx in targets {
                let column = &self.table.columns()[idx];
                if !column.dtype().is_numeric() {
                    return Err(ScourError::NonNumericColumn {
                        column: column.name().to_string(),
                        dtype: column.dtype(),
                    });
                }
            }
        }

        let mut filled = 0;
        for &idx in targets {
            let column = &self.table.columns()[idx];
            if !column.has_missing() {
                continue;
            }

            let statistic = match method {
                FillMethod::Auto if column.dtype().is_numeric() => Statistic::Mean,
                FillMethod::Mean => Statistic::Mean,
                FillMethod::Median => Statistic::Median,
                _ => Statistic::Mode,
            };

            let computed = match statistic {
                Statistic::Mean => stats::mean(&column.numeric_values())
                    .map(|m| (Value::Float(m), format!("mean: {:.2}", m))),
                Statistic::Median => stats::median(&column.numeric_values())
                    .map(|m| (Value::Float(m), format!("median: {:.2}", m))),
                Statistic::Mode => column.mode().map(|v| {
                    let note = format!("mode: {}", v);
                    (v, note)
                }),
            };

            // Nothing to compute from an all-missing column.
            let Some((value, note)) = computed else {
                debug!(column = column.name(), "no present values, fill skipped");
                continue;
            };

            let name = column.name().to_string();
            let column = self.table.column_at_mut(idx);
            if matches!(value, Value::Float(_)) {
                column.promote_to_float();
            }
            filled += fill_missing(column, &value);
            self.record(format!("Filled missing values in {} with {}", name, note));
        }

        Ok(filled)
    }

    /// Remove rows that repeat another row over `subset` (all columns when
    /// `None`). Returns the number of rows removed.
    ///
    /// An explicitly empty subset is rejected with `InvalidParameter`.
    pub fn remove_duplicates(&mut self, subset: Option<&[&str]>, keep: Keep) -> Result<usize> {
        if subset.is_some_and(<[&str]>::is_empty) {
            return Err(ScourError::InvalidParameter(
                "duplicate subset must name at least one column".to_string(),
            ));
        }
        let targets = self.resolve_columns(subset)?;
        let duplicated = self.table.duplicated(&targets, keep);
        let keep_mask: Vec<bool> = duplicated.iter().map(|&d| !d).collect();
        let removed = duplicated.iter().filter(|&&d| d).count();

        if removed > 0 {
            self.table.retain_rows(&keep_mask);
            self.record(format!("Removed {} duplicate rows", removed));
        }
        Ok(removed)
    }

    /// Rename columns, old name to new name, in mapping order.
    ///
    /// Every old name must exist and the result must keep names unique.
    pub fn rename_columns(&mut self, mapping: &IndexMap<String, String>) -> Result<()> {
        let mut final_names: Vec<String> = self
            .table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut plan = Vec::with_capacity(mapping.len());
        for (old, new) in mapping {
            let idx = self.table.require_index(old)?;
            final_names[idx] = new.clone();
            plan.push((idx, new.clone()));
        }

        for (pos, name) in final_names.iter().enumerate() {
            if final_names[..pos].contains(name) {
                return Err(ScourError::DuplicateColumn(name.clone()));
            }
        }

        if mapping.iter().all(|(old, new)| old == new) {
            return Ok(());
        }

        for (idx, new) in plan {
            self.table.column_at_mut(idx).rename(new);
        }

        let pairs: Vec<String> = mapping
            .iter()
            .map(|(old, new)| format!("{} → {}", old, new))
            .collect();
        self.record(format!("Renamed columns: {}", pairs.join(", ")));
        Ok(())
    }

    /// Convert columns to new types.
    ///
    /// Each column converts independently: a failure is logged and reported
    /// in the outcome list, leaves that column unchanged and does not stop
    /// the rest of the batch.
    pub fn change_data_types(&mut self, mapping: &IndexMap<String, ColumnType>) -> Vec<ColumnOutcome> {
        let mut outcomes = Vec::with_capacity(mapping.len());

        for (name, &target) in mapping {
            let Some(idx) = self.table.column_index(name) else {
                debug!(column = %name, "conversion skipped, column not present");
                outcomes.push(ColumnOutcome::skipped(name, "column not found"));
                continue;
            };

            match convert_column(&self.table.columns()[idx], target) {
                Ok(values) => {
                    self.table.column_at_mut(idx).set_typed(target, values);
                    self.record(format!("Changed {} to {}", name, target));
                    outcomes.push(ColumnOutcome::applied(name));
                }
                Err(err) => {
                    let message = match &err {
                        ScourError::TypeConversion { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    warn!(column = %name, %target, %message, "type conversion failed");
                    self.record(format!(
                        "Failed to convert {} to {}: {}",
                        name, target, message
                    ));
                    outcomes.push(ColumnOutcome::failed(name, err.to_string()));
                }
            }
        }

        outcomes
    }
}

#[derive(Clone, Copy)]
enum Statistic {
    Mean,
    Median,
    Mode,
}

/// Cast every value of a column, failing on the first value that cannot be
/// represented in `target`.
fn convert_column(column: &Column, target: ColumnType) -> Result<Vec<Value>> {
    column
        .values()
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .cast(target)
                .map_err(|message| ScourError::TypeConversion {
                    column: column.name().to_string(),
                    target,
                    message: format!("{} (row {})", message, row),
                })
        })
        .collect()
}

/// Fit a constant into a column's type. The flag asks for the column to be
/// widened to float first.
fn fill_value_for(column: &Column, value: &Value) -> Result<(Value, bool)> {
    let incompatible = || ScourError::IncompatibleFill {
        column: column.name().to_string(),
        dtype: column.dtype(),
        value: value.to_string(),
    };

    match column.dtype() {
        ColumnType::Integer => match value.cast(ColumnType::Integer) {
            Ok(v) => Ok((v, false)),
            Err(_) => value
                .cast(ColumnType::Float)
                .map(|v| (v, true))
                .map_err(|_| incompatible()),
        },
        dtype => value.cast(dtype).map(|v| (v, false)).map_err(|_| incompatible()),
    }
}

/// Replace missing values in a column, returning how many were replaced.
fn fill_missing(column: &mut Column, fill: &Value) -> usize {
    let mut filled = 0;
    for value in column.values_mut().iter_mut().filter(|v| v.is_missing()) {
        *value = fill.clone();
        filled += 1;
    }
    filled
}

impl From<Table> for Cleaner {
    /// Take ownership of a table the caller no longer needs.
    fn from(table: Table) -> Self {
        Self {
            table,
            log: Vec::new(),
        }
    }
}
