//! Writing tables back out as CSV, TSV or JSON records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScourError};
use crate::table::{Table, Value};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    /// Array of row objects keyed by column name.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" | "tab" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write `table` to a file.
pub fn write_table(table: &Table, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ScourError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    write_to(table, &mut writer, format)?;
    writer.flush().map_err(|source| ScourError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `table` to any writer. Missing cells are empty fields in delimited
/// output and `null` in JSON.
pub fn write_to<W: Write>(table: &Table, writer: W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_delimited(table, writer, b','),
        OutputFormat::Tsv => write_delimited(table, writer, b'\t'),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(writer, &records(table))?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    out.write_record(table.column_names())?;
    for row in table.rows() {
        out.write_record(row.iter().map(|v| v.to_string()))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Rows as ordered name-to-value maps.
pub fn records(table: &Table) -> Vec<IndexMap<&str, &Value>> {
    let names = table.column_names();
    table
        .rows()
        .map(|row| names.iter().copied().zip(row).collect())
        .collect()
}
