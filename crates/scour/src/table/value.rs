//! Cell values and type casting.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::datetime::{format_datetime, parse_datetime};
use super::types::ColumnType;

/// A single cell in a table.
///
/// A `Float` holding NaN is treated as missing everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing marker.
    Missing,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Categorical(String),
}

/// Hashable identity of a value, used for duplicate detection and counting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Missing,
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if this value is the missing marker (or NaN).
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Type this value naturally belongs to, or `None` when missing.
    pub fn dtype(&self) -> Option<ColumnType> {
        match self {
            Value::Missing => None,
            Value::Float(f) if f.is_nan() => None,
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::Integer(_) => Some(ColumnType::Integer),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Text(_) => Some(ColumnType::Text),
            Value::DateTime(_) => Some(ColumnType::DateTime),
            Value::Categorical(_) => Some(ColumnType::Categorical),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Label view for text-like values.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Hashable identity of this value.
    ///
    /// Text and categorical values with the same label share a key, and
    /// `-0.0` shares a key with `0.0`.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Missing => ValueKey::Missing,
            Value::Float(f) if f.is_nan() => ValueKey::Missing,
            Value::Float(f) if *f == 0.0 => ValueKey::Float(0f64.to_bits()),
            Value::Float(f) => ValueKey::Float(f.to_bits()),
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::Integer(i) => ValueKey::Integer(*i),
            Value::Text(s) | Value::Categorical(s) => ValueKey::Text(s.clone()),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }

    /// Cast this value to `target`.
    ///
    /// Missing stays missing. The error string describes why the cast failed.
    pub fn cast(&self, target: ColumnType) -> Result<Value, String> {
        if self.is_missing() {
            return Ok(Value::Missing);
        }

        match target {
            ColumnType::Integer => self.to_integer(),
            ColumnType::Float => self.to_float(),
            ColumnType::Boolean => self.to_boolean(),
            ColumnType::DateTime => self.to_datetime(),
            ColumnType::Text => Ok(Value::Text(self.to_string())),
            ColumnType::Categorical => Ok(Value::Categorical(self.to_string())),
        }
    }

    fn to_integer(&self) -> Result<Value, String> {
        match self {
            Value::Integer(i) => Ok(Value::Integer(*i)),
            Value::Float(f) => float_to_integer(*f),
            Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
            Value::Text(s) | Value::Categorical(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| format!("invalid literal for int: '{}'", trimmed))
            }
            Value::DateTime(_) => Err("cannot cast datetime to int".to_string()),
            Value::Missing => Ok(Value::Missing),
        }
    }

    fn to_float(&self) -> Result<Value, String> {
        match self {
            Value::Integer(i) => Ok(Value::Float(*i as f64)),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Boolean(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Text(s) | Value::Categorical(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| format!("could not convert string to float: '{}'", trimmed))
            }
            Value::DateTime(_) => Err("cannot cast datetime to float".to_string()),
            Value::Missing => Ok(Value::Missing),
        }
    }

    fn to_boolean(&self) -> Result<Value, String> {
        match self {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            Value::Integer(i) => Ok(Value::Boolean(*i != 0)),
            Value::Float(f) => Ok(Value::Boolean(*f != 0.0)),
            Value::Text(s) | Value::Categorical(s) => parse_boolean(s)
                .map(Value::Boolean)
                .ok_or_else(|| format!("cannot interpret '{}' as bool", s.trim())),
            Value::DateTime(_) => Err("cannot cast datetime to bool".to_string()),
            Value::Missing => Ok(Value::Missing),
        }
    }

    fn to_datetime(&self) -> Result<Value, String> {
        match self {
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Text(s) | Value::Categorical(s) => parse_datetime(s)
                .map(Value::DateTime)
                .ok_or_else(|| format!("unknown datetime format: '{}'", s.trim())),
            other => Err(format!(
                "cannot cast {} to datetime",
                other.dtype().map(|t| t.label()).unwrap_or("missing")
            )),
        }
    }
}

fn float_to_integer(f: f64) -> Result<Value, String> {
    if !f.is_finite() {
        Err(format!("cannot convert non-finite value {} to int", f))
    } else if f.fract() != 0.0 {
        Err(format!("cannot convert non-integral value {} to int", f))
    } else if f < i64::MIN as f64 || f > i64::MAX as f64 {
        Err(format!("value {} is out of range for int", f))
    } else {
        Ok(Value::Integer(f as i64))
    }
}

/// Interpret common boolean spellings.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Format a float so it always reads as a float (`30.0`, not `30`).
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_nan() => Ok(()),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Text(s) | Value::Categorical(s) => f.write_str(s),
            Value::DateTime(dt) => f.write_str(&format_datetime(dt)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_detection() {
        assert!(Value::Missing.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert!(!Value::Text(String::new()).is_missing());
    }

    #[test]
    fn test_cast_to_integer() {
        assert_eq!(Value::from("42").cast(ColumnType::Integer), Ok(Value::Integer(42)));
        assert_eq!(Value::Float(3.0).cast(ColumnType::Integer), Ok(Value::Integer(3)));
        assert!(Value::Float(3.5).cast(ColumnType::Integer).is_err());
        assert!(Value::from("abc").cast(ColumnType::Integer).is_err());
        assert_eq!(Value::Missing.cast(ColumnType::Integer), Ok(Value::Missing));
    }

    #[test]
    fn test_cast_to_text_uses_display() {
        assert_eq!(Value::Float(2.0).cast(ColumnType::Text), Ok(Value::from("2.0")));
        assert_eq!(
            Value::Integer(7).cast(ColumnType::Categorical),
            Ok(Value::Categorical("7".to_string()))
        );
    }

    #[test]
    fn test_cast_to_boolean() {
        assert_eq!(Value::from("Yes").cast(ColumnType::Boolean), Ok(Value::Boolean(true)));
        assert_eq!(Value::Integer(0).cast(ColumnType::Boolean), Ok(Value::Boolean(false)));
        assert!(Value::from("maybe").cast(ColumnType::Boolean).is_err());
    }

    #[test]
    fn test_keys_normalize_zero_and_labels() {
        assert_eq!(Value::Float(-0.0).key(), Value::Float(0.0).key());
        assert_eq!(
            Value::from("a").key(),
            Value::Categorical("a".to_string()).key()
        );
        assert_eq!(Value::Float(f64::NAN).key(), Value::Missing.key());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(27.5).to_string(), "27.5");
        assert_eq!(Value::Float(30.0).to_string(), "30.0");
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }
}
