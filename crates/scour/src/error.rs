//! Error types for the scour library.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::ColumnType;

/// Main error type for scour operations.
#[derive(Debug, Error)]
pub enum ScourError {
    /// A referenced column is not present in the table.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column name would appear twice in the table.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Columns passed to a table have differing lengths.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A single column could not be cast to the requested type.
    #[error("Failed to convert '{column}' to {target}: {message}")]
    TypeConversion {
        column: String,
        target: ColumnType,
        message: String,
    },

    /// A constant fill value cannot be stored in the target column.
    #[error("Fill value '{value}' is not compatible with {dtype} column '{column}'")]
    IncompatibleFill {
        column: String,
        dtype: ColumnType,
        value: String,
    },

    /// A numeric statistic was requested for a non-numeric column.
    #[error("Column '{column}' is {dtype}, expected a numeric column")]
    NonNumericColumn { column: String, dtype: ColumnType },

    /// A categorical column has too many distinct values to encode.
    #[error("Column '{column}' has {cardinality} distinct values (limit {limit})")]
    EncodingOverflow {
        column: String,
        cardinality: usize,
        limit: usize,
    },

    /// A numeric parameter is outside its accepted range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for scour operations.
pub type Result<T> = std::result::Result<T, ScourError>;
