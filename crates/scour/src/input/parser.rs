//! CSV/TSV loader with delimiter detection and column type inference.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{is_missing_token, SourceMetadata};
use crate::error::{Result, ScourError};
use crate::table::{parse_datetime, Column, ColumnType, Table, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited text files into typed tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| ScourError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            %format,
            "loaded table"
        );

        let metadata = SourceMetadata::new(path.to_path_buf(), hash, size_bytes, format, table.shape());
        Ok((table, metadata))
    }

    /// Parse in-memory text, detecting the delimiter unless configured.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record?,
            None => return Err(ScourError::EmptyData("No data rows found".to_string())),
        };

        let (headers, mut rows) = if self.config.has_header {
            let headers: Vec<String> = first.iter().map(|h| h.trim().to_string()).collect();
            (headers, Vec::new())
        } else {
            let headers = (0..first.len()).map(|i| format!("column_{}", i + 1)).collect();
            (headers, vec![first.iter().map(str::to_string).collect::<Vec<_>>()])
        };

        if headers.is_empty() {
            return Err(ScourError::EmptyData("No columns found".to_string()));
        }
        let expected_cols = headers.len();

        for result in records {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();

            // Short rows are padded with missing cells, long rows truncated.
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ScourError::EmptyData("No data rows found".to_string()));
        }

        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
                let (dtype, values) = infer_column(&raw);
                Column::new(name, dtype, values)
            })
            .collect::<Result<Vec<_>>>()?;

        Table::new(columns)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the narrowest type every present cell parses as, in the order
/// integer, float, boolean, datetime, text.
fn infer_column(raw: &[&str]) -> (ColumnType, Vec<Value>) {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_missing_token(s))
        .collect();

    let dtype = if present.is_empty() {
        ColumnType::Float
    } else if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if present
        .iter()
        .all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"))
    {
        ColumnType::Boolean
    } else if present.iter().all(|s| parse_datetime(s).is_some()) {
        ColumnType::DateTime
    } else {
        ColumnType::Text
    };

    let values = raw
        .iter()
        .map(|cell| {
            if is_missing_token(cell) {
                return Value::Missing;
            }
            let trimmed = cell.trim();
            match dtype {
                ColumnType::Integer => trimmed.parse().map(Value::Integer).unwrap_or(Value::Missing),
                ColumnType::Float => trimmed.parse().map(Value::Float).unwrap_or(Value::Missing),
                ColumnType::Boolean => Value::Boolean(trimmed.eq_ignore_ascii_case("true")),
                ColumnType::DateTime => parse_datetime(trimmed)
                    .map(Value::DateTime)
                    .unwrap_or(Value::Missing),
                _ => Value::Text(cell.to_string()),
            }
        })
        .collect();

    (dtype, values)
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ScourError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Higher count with lower variance wins; tab breaks ties.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_infers_types() {
        let table = Parser::new()
            .parse_str("name,age,score,active,joined\nAlice,30,1.5,true,2024-01-05\nBob,NA,2,False,2024-02-10\n")
            .unwrap();

        let types: Vec<ColumnType> = table.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Text,
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::Boolean,
                ColumnType::DateTime
            ]
        );
        assert_eq!(table.get(1, 1), Some(&Value::Missing));
        assert_eq!(table.get(1, 2), Some(&Value::Float(2.0)));
        assert_eq!(table.get(1, 3), Some(&Value::Boolean(false)));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = Parser::new().parse_str("a,b,c\n1,2\n3,4,5,6\n").unwrap();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.get(0, 2), Some(&Value::Missing));
        assert_eq!(table.get(1, 2), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_no_header_generates_names() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("1,x\n2,y\n").unwrap();
        assert_eq!(table.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_str("a\n1\n2\n3\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty_data() {
        assert!(matches!(
            Parser::new().parse_str("a,b\n"),
            Err(ScourError::EmptyData(_))
        ));
    }
}
