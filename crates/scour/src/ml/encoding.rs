//! Temporary numeric encodings of table columns.
//!
//! Label columns are mapped to integer codes only for the duration of a
//! [`with_encoded`] call. The table itself never holds encoded values.

use crate::error::{Result, ScourError};
use crate::table::{Column, ColumnType, Table, Value};

/// Label columns with this many distinct values or more are not encoded.
pub const MAX_CATEGORIES: usize = 50;

/// Sorted label set of one column. Code `i` stands for the `i`-th label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoding {
    dtype: ColumnType,
    classes: Vec<String>,
}

impl LabelEncoding {
    /// Learn the labels of a text or categorical column.
    pub fn fit(column: &Column) -> Result<Self> {
        if !column.dtype().is_label() {
            return Err(ScourError::InvalidParameter(format!(
                "column '{}' is {}, not a label column",
                column.name(),
                column.dtype()
            )));
        }

        let mut classes: Vec<String> = column
            .values()
            .iter()
            .filter_map(Value::as_label)
            .map(str::to_string)
            .collect();
        classes.sort();
        classes.dedup();

        if classes.len() >= MAX_CATEGORIES {
            return Err(ScourError::EncodingOverflow {
                column: column.name().to_string(),
                cardinality: classes.len(),
                limit: MAX_CATEGORIES,
            });
        }

        Ok(Self {
            dtype: column.dtype(),
            classes,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for a value; `NaN` for missing or unknown labels.
    pub fn encode(&self, value: &Value) -> f64 {
        value
            .as_label()
            .and_then(|label| self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok())
            .map_or(f64::NAN, |code| code as f64)
    }

    /// Label for a code, rounding to the nearest valid code.
    pub fn decode(&self, code: f64) -> Value {
        if code.is_nan() || self.classes.is_empty() {
            return Value::Missing;
        }

        let last = (self.classes.len() - 1) as f64;
        let idx = code.round().clamp(0.0, last) as usize;
        let label = self.classes[idx].clone();
        match self.dtype {
            ColumnType::Categorical => Value::Categorical(label),
            _ => Value::Text(label),
        }
    }
}

/// One column of the feature matrix.
#[derive(Debug, Clone)]
pub struct Feature {
    index: usize,
    encoding: Option<LabelEncoding>,
}

impl Feature {
    /// Use a numeric column as is.
    pub fn numeric(index: usize) -> Self {
        Self {
            index,
            encoding: None,
        }
    }

    /// Use a label column through its encoding.
    pub fn encoded(index: usize, encoding: LabelEncoding) -> Self {
        Self {
            index,
            encoding: Some(encoding),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn encode(&self, value: &Value) -> f64 {
        match &self.encoding {
            Some(encoding) => encoding.encode(value),
            None => value.as_f64().unwrap_or(f64::NAN),
        }
    }
}

/// New contents for a column whose missing cells were filled.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedColumn {
    pub index: usize,
    pub dtype: ColumnType,
    pub values: Vec<Value>,
    /// Cells that were missing before and are present now.
    pub filled: usize,
}

/// Encode `features` of `table` into a row-major matrix, hand it to
/// `transform`, and decode the result back into column values.
///
/// Only cells that were missing take values from the transformed matrix.
/// The encodings are dropped before this returns; the caller decides whether
/// to commit the decoded columns.
pub fn with_encoded<F>(table: &Table, features: Vec<Feature>, transform: F) -> Result<Vec<DecodedColumn>>
where
    F: FnOnce(&[Vec<f64>]) -> Result<Vec<Vec<f64>>>,
{
    let columns = table.columns();
    let matrix: Vec<Vec<f64>> = (0..table.row_count())
        .map(|row| {
            features
                .iter()
                .map(|f| f.encode(&columns[f.index].values()[row]))
                .collect()
        })
        .collect();

    let transformed = transform(&matrix)?;
    if transformed.len() != matrix.len() {
        return Err(ScourError::ShapeMismatch {
            column: "<encoded>".to_string(),
            expected: matrix.len(),
            actual: transformed.len(),
        });
    }

    Ok(features
        .iter()
        .enumerate()
        .map(|(j, feature)| {
            let column = &columns[feature.index];
            let fills = transformed.iter().map(|row| row.get(j).copied().unwrap_or(f64::NAN));
            decode_column(feature.index, column, feature.encoding.as_ref(), fills)
        })
        .collect())
}

fn decode_column(
    index: usize,
    column: &Column,
    encoding: Option<&LabelEncoding>,
    fills: impl Iterator<Item = f64>,
) -> DecodedColumn {
    let mut dtype = column.dtype();
    let mut filled = 0;

    let mut values: Vec<Value> = column
        .values()
        .iter()
        .zip(fills)
        .map(|(original, fill)| {
            if !original.is_missing() || fill.is_nan() {
                return original.clone();
            }
            filled += 1;
            match encoding {
                Some(encoding) => encoding.decode(fill),
                None => Value::Float(fill),
            }
        })
        .collect();

    if dtype == ColumnType::Integer {
        let integral = values.iter().all(|v| match v {
            Value::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
            _ => true,
        });

        if integral {
            for value in &mut values {
                if let Value::Float(f) = value {
                    *value = Value::Integer(*f as i64);
                }
            }
        } else {
            dtype = ColumnType::Float;
            for value in &mut values {
                if let Value::Integer(i) = value {
                    *value = Value::Float(*i as f64);
                }
            }
        }
    }

    DecodedColumn {
        index,
        dtype,
        values,
        filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Table {
        Table::from_rows(
            &["n", "grade"],
            vec![
                vec![1.into(), "b".into()],
                vec![Value::Missing, "a".into()],
                vec![3.into(), Value::Missing],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_codes_follow_sorted_labels() {
        let table = mixed();
        let encoding = LabelEncoding::fit(table.column("grade").unwrap()).unwrap();
        assert_eq!(encoding.classes(), &["a".to_string(), "b".to_string()]);
        assert_eq!(encoding.encode(&"b".into()), 1.0);
        assert!(encoding.encode(&Value::Missing).is_nan());
        assert_eq!(encoding.decode(0.4), Value::Text("a".into()));
        assert_eq!(encoding.decode(7.0), Value::Text("b".into()));
        assert_eq!(encoding.decode(-2.0), Value::Text("a".into()));
    }

    #[test]
    fn test_rejects_high_cardinality() {
        let values = (0..MAX_CATEGORIES).map(|i| Value::Text(format!("v{}", i))).collect();
        let column = Column::new("id", ColumnType::Text, values).unwrap();
        assert!(matches!(
            LabelEncoding::fit(&column),
            Err(ScourError::EncodingOverflow { cardinality: 50, limit: 50, .. })
        ));
    }

    #[test]
    fn test_only_missing_cells_are_replaced() {
        let table = mixed();
        let encoding = LabelEncoding::fit(table.column("grade").unwrap()).unwrap();
        let features = vec![Feature::numeric(0), Feature::encoded(1, encoding)];

        let decoded = with_encoded(&table, features, |m| {
            Ok(m.iter()
                .map(|row| row.iter().map(|v| if v.is_nan() { 2.0 } else { v + 100.0 }).collect())
                .collect())
        })
        .unwrap();

        assert_eq!(decoded[0].dtype, ColumnType::Integer);
        assert_eq!(decoded[0].values, vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(decoded[0].filled, 1);
        assert_eq!(decoded[1].values[2], Value::Text("b".into()));
        assert_eq!(decoded[1].values[0], Value::Text("b".into()));
    }

    #[test]
    fn test_fractional_fill_widens_integer_column() {
        let table = mixed();
        let decoded = with_encoded(&table, vec![Feature::numeric(0)], |m| {
            Ok(m.iter().map(|row| vec![if row[0].is_nan() { 2.5 } else { row[0] }]).collect())
        })
        .unwrap();

        assert_eq!(decoded[0].dtype, ColumnType::Float);
        assert_eq!(decoded[0].values, vec![Value::Float(1.0), Value::Float(2.5), Value::Float(3.0)]);
    }
}
