//! Core type definitions for column representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared semantic type of a column.
///
/// Serialized under the same short names used in change-log entries; the
/// long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Whole numbers.
    #[serde(rename = "int", alias = "integer")]
    Integer,
    /// Floating-point numbers.
    #[serde(rename = "float")]
    Float,
    /// Free text.
    #[serde(rename = "str", alias = "string", alias = "text")]
    Text,
    /// Boolean values (true/false).
    #[serde(rename = "bool", alias = "boolean")]
    Boolean,
    /// Date and time values.
    #[serde(rename = "datetime", alias = "date_time")]
    DateTime,
    /// Labels from a finite domain.
    #[serde(rename = "category", alias = "categorical")]
    Categorical,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if values of this type are labels (text-like).
    pub fn is_label(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Categorical)
    }

    /// Short name used in change-log entries.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Text => "str",
            ColumnType::Boolean => "bool",
            ColumnType::DateTime => "datetime",
            ColumnType::Categorical => "category",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" | "int64" => Ok(ColumnType::Integer),
            "float" | "float64" | "double" => Ok(ColumnType::Float),
            "str" | "string" | "text" | "object" => Ok(ColumnType::Text),
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            "datetime" | "datetime64" | "date" => Ok(ColumnType::DateTime),
            "category" | "categorical" => Ok(ColumnType::Categorical),
            other => Err(format!(
                "Unknown type: {}. Use int, float, str, bool, datetime, or category.",
                other
            )),
        }
    }
}
