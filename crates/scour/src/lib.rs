//! Scour: data-cleaning engine for tabular datasets.
//!
//! Scour holds a private copy of a table and applies cleaning operations to
//! it, recording a human-readable entry for every change it makes.
//!
//! # Core Principles
//!
//! - **Non-destructive**: The caller's table is copied on construction
//! - **Logged**: Every change appends one line to the change log
//! - **Deterministic**: Outlier detection uses a fixed seed
//!
//! # Example
//!
//! ```no_run
//! use scour::{Augmentor, FillMethod, MissingStrategy, Parser};
//!
//! let (table, _meta) = Parser::new().parse_file("survey.csv").unwrap();
//! let mut engine = Augmentor::new(&table);
//!
//! engine
//!     .cleaner_mut()
//!     .handle_missing(&MissingStrategy::Fill(FillMethod::Auto), None)
//!     .unwrap();
//! engine.remove_outliers(None, 0.05).unwrap();
//!
//! for entry in engine.changes_log() {
//!     println!("{}", entry);
//! }
//! ```

pub mod engine;
pub mod error;
pub mod input;
pub mod ml;
pub mod output;
pub mod profile;
pub mod recipe;
pub mod stats;
pub mod table;

pub use engine::{Cleaner, CleaningRecord, ColumnOutcome, FillMethod, Keep, MissingStrategy, OutcomeStatus};
pub use error::{Result, ScourError};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use ml::{Augmentor, ImputationReport, OutlierMask, Suggestion, SuggestionKind};
pub use output::{write_table, OutputFormat};
pub use profile::{ColumnProfile, TableProfile};
pub use recipe::{Operation, Recipe};
pub use table::{Column, ColumnType, Table, Value};
