//! Table transformer: column drops, missing values, duplicates, renames and
//! type conversion over an owned copy of a table.

mod cleaner;
mod history;
mod operations;

pub use cleaner::Cleaner;
pub use history::CleaningRecord;
pub use operations::{ColumnOutcome, FillMethod, Keep, MissingStrategy, OutcomeStatus};
