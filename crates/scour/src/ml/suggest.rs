//! Advisory cleaning suggestions derived from a table.

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Kind of cleaning step a suggestion points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Some cells are missing.
    HandleMissing,
    /// Some rows repeat earlier rows.
    RemoveDuplicates,
    /// Numeric columns are worth an outlier pass.
    CheckOutliers,
}

impl SuggestionKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::HandleMissing => "Handle Missing Values",
            SuggestionKind::RemoveDuplicates => "Remove Duplicates",
            SuggestionKind::CheckOutliers => "Check Outliers",
        }
    }
}

/// A proposed cleaning step. The caller decides whether to act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// What to do.
    pub action: SuggestionKind,

    /// Columns the suggestion concerns; empty when it concerns whole rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Human-readable rationale.
    pub message: String,

    /// Count behind the rationale (columns or rows, depending on the kind).
    pub affected: usize,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(action: SuggestionKind, message: impl Into<String>) -> Self {
        Self {
            action,
            columns: Vec::new(),
            message: message.into(),
            affected: 0,
        }
    }

    /// Set the affected columns.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the affected count.
    pub fn with_affected(mut self, count: usize) -> Self {
        self.affected = count;
        self
    }
}

/// Rule-based suggestion generation.
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggestions for `table`, in the order missing values, duplicates,
    /// outliers.
    pub fn generate(table: &Table) -> Vec<Suggestion> {
        [
            Self::suggest_handle_missing(table),
            Self::suggest_remove_duplicates(table),
            Self::suggest_check_outliers(table),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn suggest_handle_missing(table: &Table) -> Option<Suggestion> {
        let columns: Vec<String> = table
            .missing_counts()
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(name, _)| name)
            .collect();

        if columns.is_empty() {
            return None;
        }

        Some(
            Suggestion::new(
                SuggestionKind::HandleMissing,
                format!("{} columns have missing values", columns.len()),
            )
            .with_affected(columns.len())
            .with_columns(columns),
        )
    }

    fn suggest_remove_duplicates(table: &Table) -> Option<Suggestion> {
        let duplicates = table.duplicate_count();
        if duplicates == 0 {
            return None;
        }

        Some(
            Suggestion::new(
                SuggestionKind::RemoveDuplicates,
                format!("{} duplicate rows found", duplicates),
            )
            .with_affected(duplicates),
        )
    }

    fn suggest_check_outliers(table: &Table) -> Option<Suggestion> {
        let numeric: Vec<String> = table
            .numeric_columns()
            .into_iter()
            .map(str::to_string)
            .collect();

        if numeric.is_empty() {
            return None;
        }

        Some(
            Suggestion::new(
                SuggestionKind::CheckOutliers,
                format!("Potential outliers in {} numeric columns", numeric.len()),
            )
            .with_affected(numeric.len())
            .with_columns(numeric),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn test_clean_numeric_table_only_checks_outliers() {
        let table = Table::from_rows(
            &["a", "b"],
            vec![
                vec![1.into(), 2.5.into()],
                vec![2.into(), 3.5.into()],
                vec![3.into(), 4.5.into()],
            ],
        )
        .unwrap();

        let suggestions = SuggestionEngine::generate(&table);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action, SuggestionKind::CheckOutliers);
        assert_eq!(suggestions[0].message, "Potential outliers in 2 numeric columns");
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let table = Table::from_rows(
            &["n", "tag"],
            vec![
                vec![1.into(), "x".into()],
                vec![1.into(), "x".into()],
                vec![Value::Missing, "y".into()],
            ],
        )
        .unwrap();

        let suggestions = SuggestionEngine::generate(&table);
        let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.action).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::HandleMissing,
                SuggestionKind::RemoveDuplicates,
                SuggestionKind::CheckOutliers
            ]
        );
        assert_eq!(suggestions[0].columns, vec!["n".to_string()]);
        assert_eq!(suggestions[0].message, "1 columns have missing values");
        assert_eq!(suggestions[1].message, "1 duplicate rows found");
    }

    #[test]
    fn test_text_only_table_has_no_suggestions() {
        let table = Table::from_rows(&["s"], vec![vec!["a".into()], vec!["b".into()]]).unwrap();
        assert!(SuggestionEngine::generate(&table).is_empty());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SuggestionKind::CheckOutliers).unwrap();
        assert_eq!(json, "\"check_outliers\"");
    }
}
