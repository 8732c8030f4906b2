//! Strategy types and per-column outcomes for cleaning operations.

use serde::{Deserialize, Serialize};

use crate::table::Value;

/// How to treat missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "method", rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Remove rows with a missing value in any target column.
    Drop,
    /// Replace missing values in place.
    Fill(FillMethod),
}

/// Where a fill value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Mean for numeric columns, mode for everything else.
    Auto,
    /// Column mean (numeric columns only).
    Mean,
    /// Column median (numeric columns only).
    Median,
    /// Most frequent value, ties going to the first occurrence.
    Mode,
    /// A caller-supplied constant.
    Constant(Value),
}

impl FillMethod {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FillMethod::Auto => "auto",
            FillMethod::Mean => "mean",
            FillMethod::Median => "median",
            FillMethod::Mode => "mode",
            FillMethod::Constant(_) => "constant",
        }
    }
}

/// Which member of a duplicate group survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keep {
    /// Keep the first occurrence.
    #[default]
    First,
    /// Keep the last occurrence.
    Last,
    /// Drop every copy.
    None,
}

/// What happened to one requested column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The change was made.
    Applied,
    /// Nothing was done, for the given reason.
    Skipped { reason: String },
    /// The change was attempted and failed; the column is unchanged.
    Failed { error: String },
}

/// Per-column result of a batch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutcome {
    /// Column the outcome refers to.
    pub column: String,

    /// What happened.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ColumnOutcome {
    pub fn applied(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            status: OutcomeStatus::Applied,
        }
    }

    pub fn skipped(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            status: OutcomeStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(column: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            status: OutcomeStatus::Failed {
                error: error.into(),
            },
        }
    }

    /// Whether the change was made.
    pub fn is_applied(&self) -> bool {
        self.status == OutcomeStatus::Applied
    }

    /// Whether the change was attempted and failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_json_shape() {
        let json = serde_json::to_string(&MissingStrategy::Fill(FillMethod::Constant(
            Value::Integer(0),
        )))
        .unwrap();
        assert_eq!(json, r#"{"strategy":"fill","method":{"constant":0}}"#);

        let parsed: MissingStrategy = serde_json::from_str(r#"{"strategy":"drop"}"#).unwrap();
        assert_eq!(parsed, MissingStrategy::Drop);

        let parsed: MissingStrategy =
            serde_json::from_str(r#"{"strategy":"fill","method":"median"}"#).unwrap();
        assert_eq!(parsed, MissingStrategy::Fill(FillMethod::Median));
    }

    #[test]
    fn test_outcome_flags() {
        assert!(ColumnOutcome::applied("a").is_applied());
        assert!(ColumnOutcome::failed("a", "boom").is_failed());
        assert!(!ColumnOutcome::skipped("a", "absent").is_applied());
    }
}
