//! A named, typed column of values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScourError};

use super::types::ColumnType;
use super::value::{Value, ValueKey};

/// A named column.
///
/// Every value is either missing or of the column's declared type. Integer
/// values stored in a float column are widened on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Create a column, checking each value against `dtype`.
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        let mut checked = Vec::with_capacity(values.len());

        for value in values {
            let value = match (value.dtype(), dtype) {
                (None, _) => Value::Missing,
                (Some(found), expected) if found == expected => value,
                (Some(ColumnType::Integer), ColumnType::Float) => {
                    Value::Float(value.as_f64().unwrap_or(f64::NAN))
                }
                (Some(ColumnType::Text), ColumnType::Categorical) => {
                    Value::Categorical(value.to_string())
                }
                (Some(found), expected) => {
                    return Err(ScourError::TypeConversion {
                        column: name,
                        target: expected,
                        message: format!("value '{}' has type {}", value, found),
                    });
                }
            };
            checked.push(value);
        }

        Ok(Self {
            name,
            dtype,
            values: checked,
        })
    }

    /// Create a column and infer its type from the values.
    ///
    /// Integers mixed with floats become a float column; any other mix becomes
    /// a text column holding each value's display form. A column with no
    /// present values is a float column.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let dtype = infer_dtype(&values);
        let values = values
            .into_iter()
            .map(|v| match v.dtype() {
                None => Value::Missing,
                Some(found) if found == dtype => v,
                Some(ColumnType::Integer) if dtype == ColumnType::Float => {
                    Value::Float(v.as_f64().unwrap_or(f64::NAN))
                }
                Some(_) => Value::Text(v.to_string()),
            })
            .collect();

        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    /// All values in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Number of missing values.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Whether any value is missing.
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// Present numeric values in row order (empty for non-numeric columns).
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Counts of present values, in order of first occurrence.
    pub fn value_counts(&self) -> IndexMap<ValueKey, (usize, &Value)> {
        let mut counts: IndexMap<ValueKey, (usize, &Value)> = IndexMap::new();
        for value in self.values.iter().filter(|v| !v.is_missing()) {
            counts.entry(value.key()).or_insert((0, value)).0 += 1;
        }
        counts
    }

    /// Number of distinct present values.
    pub fn unique_count(&self) -> usize {
        self.value_counts().len()
    }

    /// Most frequent present value.
    ///
    /// Ties go to the value that appears first in the column.
    pub fn mode(&self) -> Option<Value> {
        let mut best: Option<(usize, &Value)> = None;
        for (_, (count, value)) in self.value_counts() {
            if best.is_none_or(|(best_count, _)| count > best_count) {
                best = Some((count, value));
            }
        }
        best.map(|(_, v)| v.clone())
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }

    /// Replace the type and values together, bypassing checks.
    pub(crate) fn set_typed(&mut self, dtype: ColumnType, values: Vec<Value>) {
        self.dtype = dtype;
        self.values = values;
    }

    /// Keep only the rows whose mask entry is true.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        let mut idx = 0;
        self.values.retain(|_| {
            let kept = keep.get(idx).copied().unwrap_or(true);
            idx += 1;
            kept
        });
    }

    /// Widen an integer column to float.
    pub(crate) fn promote_to_float(&mut self) {
        if self.dtype != ColumnType::Integer {
            return;
        }
        self.dtype = ColumnType::Float;
        for value in &mut self.values {
            if let Value::Integer(i) = value {
                *value = Value::Float(*i as f64);
            }
        }
    }
}

fn infer_dtype(values: &[Value]) -> ColumnType {
    let mut seen: Option<ColumnType> = None;

    for dtype in values.iter().filter_map(Value::dtype) {
        seen = Some(match (seen, dtype) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(ColumnType::Integer), ColumnType::Float)
            | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
            (Some(ColumnType::Text), ColumnType::Categorical)
            | (Some(ColumnType::Categorical), ColumnType::Text) => ColumnType::Text,
            _ => return ColumnType::Text,
        });
    }

    seen.unwrap_or(ColumnType::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_widens_integers() {
        let col = Column::infer("x", vec![1.into(), 2.5.into(), Value::Missing]);
        assert_eq!(col.dtype(), ColumnType::Float);
        assert_eq!(col.values()[0], Value::Float(1.0));
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn test_infer_mixed_becomes_text() {
        let col = Column::infer("x", vec![1.into(), "a".into()]);
        assert_eq!(col.dtype(), ColumnType::Text);
        assert_eq!(col.values()[0], Value::from("1"));
    }

    #[test]
    fn test_new_rejects_wrong_type() {
        let err = Column::new("x", ColumnType::Integer, vec!["a".into()]);
        assert!(matches!(err, Err(ScourError::TypeConversion { .. })));
    }

    #[test]
    fn test_mode_prefers_first_on_tie() {
        let col = Column::infer(
            "city",
            vec!["LA".into(), "NY".into(), "NY".into(), "LA".into(), Value::Missing],
        );
        assert_eq!(col.mode(), Some(Value::from("LA")));
    }

    #[test]
    fn test_unique_count_ignores_missing() {
        let col = Column::infer("x", vec![1.into(), 1.into(), Value::Missing, 2.into()]);
        assert_eq!(col.unique_count(), 2);
    }
}
