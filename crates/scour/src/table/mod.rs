//! Typed tabular data: values, columns and tables.

mod column;
mod datetime;
mod table;
mod types;
mod value;

pub use column::Column;
pub use datetime::parse_datetime;
pub use table::Table;
pub use types::ColumnType;
pub use value::{parse_boolean, Value, ValueKey};

pub(crate) use value::format_float;
