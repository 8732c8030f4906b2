//! CLI command implementations.

pub mod clean;
pub mod outliers;
pub mod profile;
pub mod suggest;

use std::path::Path;

use scour::{Parser, SourceMetadata, Table};
use tracing::info;

/// Load a data file, failing early with a readable message when it is absent.
pub(crate) fn load(file: &Path) -> Result<(Table, SourceMetadata), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let (table, meta) = Parser::new().parse_file(file)?;
    info!(
        file = %meta.file,
        rows = meta.row_count,
        columns = meta.column_count,
        format = %meta.format,
        "loaded data file"
    );
    Ok((table, meta))
}
