//! Cleaning recipes: ordered operations that can be saved as JSON and
//! replayed against a table.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Keep, MissingStrategy};
use crate::error::{Result, ScourError};
use crate::ml::{Augmentor, DEFAULT_CONTAMINATION};
use crate::table::ColumnType;

fn default_contamination() -> f64 {
    DEFAULT_CONTAMINATION
}

/// One cleaning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    DropColumns {
        columns: Vec<String>,
    },

    HandleMissing {
        strategy: MissingStrategy,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
    },

    RemoveDuplicates {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subset: Option<Vec<String>>,
        #[serde(default)]
        keep: Keep,
    },

    /// Old name to new name.
    RenameColumns {
        mapping: IndexMap<String, String>,
    },

    ChangeDataTypes {
        mapping: IndexMap<String, ColumnType>,
    },

    DetectOutliers {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
        #[serde(default = "default_contamination")]
        contamination: f64,
    },

    RemoveOutliers {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
        #[serde(default = "default_contamination")]
        contamination: f64,
    },

    SmartImpute {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
    },
}

impl Operation {
    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            Operation::DropColumns { columns } => format!("Drop {}", columns.join(", ")),
            Operation::HandleMissing { strategy, columns } => {
                let how = match strategy {
                    MissingStrategy::Drop => "drop rows".to_string(),
                    MissingStrategy::Fill(method) => format!("fill with {}", method.label()),
                };
                format!("Missing values ({}) in {}", how, scope(columns))
            }
            Operation::RemoveDuplicates { subset, .. } => {
                format!("Remove duplicates over {}", scope(subset))
            }
            Operation::RenameColumns { mapping } => {
                let pairs: Vec<String> = mapping
                    .iter()
                    .map(|(from, to)| format!("'{}' → '{}'", from, to))
                    .collect();
                format!("Rename {}", pairs.join(", "))
            }
            Operation::ChangeDataTypes { mapping } => {
                let pairs: Vec<String> = mapping
                    .iter()
                    .map(|(column, dtype)| format!("'{}' to {}", column, dtype))
                    .collect();
                format!("Convert {}", pairs.join(", "))
            }
            Operation::DetectOutliers {
                columns,
                contamination,
            } => format!(
                "Detect outliers in {} (contamination {})",
                scope(columns),
                contamination
            ),
            Operation::RemoveOutliers {
                columns,
                contamination,
            } => format!(
                "Remove outliers in {} (contamination {})",
                scope(columns),
                contamination
            ),
            Operation::SmartImpute { columns } => format!("KNN imputation in {}", scope(columns)),
        }
    }
}

fn scope(columns: &Option<Vec<String>>) -> String {
    match columns {
        Some(names) => names.join(", "),
        None => "all columns".to_string(),
    }
}

/// Borrow an optional owned column list as the slice form the engines take.
fn as_names(columns: &Option<Vec<String>>) -> Option<Vec<&str>> {
    columns
        .as_ref()
        .map(|names| names.iter().map(String::as_str).collect())
}

/// An ordered list of operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub operations: Vec<Operation>,
}

impl Recipe {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Parse a recipe from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the recipe as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a recipe from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScourError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Save the recipe to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ScourError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Augmentor {
    /// Run one operation against the held table.
    pub fn apply(&mut self, operation: &Operation) -> Result<()> {
        debug!(operation = %operation.description(), "applying operation");

        match operation {
            Operation::DropColumns { columns } => {
                self.cleaner_mut().drop_columns(columns);
            }
            Operation::HandleMissing { strategy, columns } => {
                let names = as_names(columns);
                self.cleaner_mut().handle_missing(strategy, names.as_deref())?;
            }
            Operation::RemoveDuplicates { subset, keep } => {
                let names = as_names(subset);
                self.cleaner_mut().remove_duplicates(names.as_deref(), *keep)?;
            }
            Operation::RenameColumns { mapping } => {
                self.cleaner_mut().rename_columns(mapping)?;
            }
            Operation::ChangeDataTypes { mapping } => {
                self.cleaner_mut().change_data_types(mapping);
            }
            Operation::DetectOutliers {
                columns,
                contamination,
            } => {
                let names = as_names(columns);
                self.detect_outliers(names.as_deref(), *contamination)?;
            }
            Operation::RemoveOutliers {
                columns,
                contamination,
            } => {
                let names = as_names(columns);
                self.remove_outliers(names.as_deref(), *contamination)?;
            }
            Operation::SmartImpute { columns } => {
                let names = as_names(columns);
                self.smart_impute(names.as_deref())?;
            }
        }

        Ok(())
    }

    /// Run every operation of a recipe in order, stopping at the first hard
    /// error. Changes made before the error stay in place.
    pub fn apply_recipe(&mut self, recipe: &Recipe) -> Result<()> {
        for operation in &recipe.operations {
            self.apply(operation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FillMethod;
    use crate::table::Table;

    #[test]
    fn test_operation_json_shape() {
        let recipe = Recipe::from_json(
            r#"{"operations": [
                {"op": "drop_columns", "columns": ["notes"]},
                {"op": "handle_missing", "strategy": {"strategy": "fill", "method": "auto"}},
                {"op": "remove_duplicates"},
                {"op": "change_data_types", "mapping": {"age": "int"}},
                {"op": "remove_outliers"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(recipe.operations.len(), 5);
        assert_eq!(
            recipe.operations[1],
            Operation::HandleMissing {
                strategy: MissingStrategy::Fill(FillMethod::Auto),
                columns: None
            }
        );
        assert_eq!(
            recipe.operations[2],
            Operation::RemoveDuplicates {
                subset: None,
                keep: Keep::First
            }
        );
        assert!(matches!(
            recipe.operations[4],
            Operation::RemoveOutliers { contamination, .. } if contamination == DEFAULT_CONTAMINATION
        ));
    }

    #[test]
    fn test_descriptions() {
        let op = Operation::HandleMissing {
            strategy: MissingStrategy::Fill(FillMethod::Median),
            columns: Some(vec!["age".into()]),
        };
        assert_eq!(op.description(), "Missing values (fill with median) in age");

        let op = Operation::SmartImpute { columns: None };
        assert_eq!(op.description(), "KNN imputation in all columns");
    }

    #[test]
    fn test_empty_duplicate_subset_stops_the_recipe() {
        let table = Table::from_rows(
            &["id"],
            vec![vec![1.into()], vec![2.into()], vec![3.into()]],
        )
        .unwrap();
        let recipe =
            Recipe::from_json(r#"{"operations": [{"op": "remove_duplicates", "subset": []}]}"#)
                .unwrap();

        let mut engine = Augmentor::new(&table);
        let result = engine.apply_recipe(&recipe);

        assert!(matches!(result, Err(ScourError::InvalidParameter(_))));
        assert_eq!(engine.cleaned_data().row_count(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipe.json");
        let recipe = Recipe::new(vec![Operation::SmartImpute {
            columns: Some(vec!["x".into()]),
        }]);

        recipe.save(&path).unwrap();
        assert_eq!(Recipe::load(&path).unwrap(), recipe);
    }
}
