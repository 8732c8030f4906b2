//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scour::{FillMethod, MissingStrategy, OutputFormat, Value};

/// Scour: clean tabular data files
#[derive(Parser)]
#[command(name = "scour")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show column types, missing values and summary statistics
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest cleaning steps for a data file
    Suggest {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flag outlier rows with an isolation forest
    Outliers {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Numeric columns to consider (default: all numeric columns)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Expected share of outliers, in (0, 0.5]
        #[arg(long, default_value = "0.05")]
        contamination: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a data file and write the result
    Clean {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Recipe file (JSON) to replay instead of the flags below
        #[arg(short, long)]
        recipe: Option<PathBuf>,

        /// Output path for cleaned data (default: <file>_cleaned.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from output extension, else csv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Columns to drop
        #[arg(long, value_delimiter = ',')]
        drop: Vec<String>,

        /// Missing-value handling: drop, auto, mean, median or mode
        #[arg(long)]
        missing: Option<MissingChoice>,

        /// Fill missing values with this constant
        #[arg(long, conflicts_with = "missing")]
        fill_value: Option<String>,

        /// Remove duplicate rows
        #[arg(long)]
        dedupe: bool,

        /// Fill missing values with KNN imputation
        #[arg(long)]
        impute: bool,

        /// Remove outlier rows
        #[arg(long)]
        remove_outliers: bool,

        /// Expected share of outliers, in (0, 0.5]
        #[arg(long, default_value = "0.05")]
        contamination: f64,

        /// Write the session history record (JSON) here
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

/// Missing-value handling choice.
#[derive(Clone, Debug)]
pub enum MissingChoice {
    Drop,
    Auto,
    Mean,
    Median,
    Mode,
}

impl MissingChoice {
    pub fn strategy(&self) -> MissingStrategy {
        match self {
            MissingChoice::Drop => MissingStrategy::Drop,
            MissingChoice::Auto => MissingStrategy::Fill(FillMethod::Auto),
            MissingChoice::Mean => MissingStrategy::Fill(FillMethod::Mean),
            MissingChoice::Median => MissingStrategy::Fill(FillMethod::Median),
            MissingChoice::Mode => MissingStrategy::Fill(FillMethod::Mode),
        }
    }
}

impl std::str::FromStr for MissingChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(MissingChoice::Drop),
            "auto" | "fill" => Ok(MissingChoice::Auto),
            "mean" => Ok(MissingChoice::Mean),
            "median" => Ok(MissingChoice::Median),
            "mode" => Ok(MissingChoice::Mode),
            _ => Err(format!(
                "Unknown strategy: {}. Use drop, auto, mean, median, or mode.",
                s
            )),
        }
    }
}

/// Read a constant from the command line as the narrowest value it fits.
pub fn parse_constant(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Float(f)
    } else {
        Value::Text(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_flags() {
        let cli = Cli::parse_from([
            "scour",
            "clean",
            "data.csv",
            "--drop",
            "a,b",
            "--missing",
            "median",
            "--dedupe",
            "-f",
            "json",
        ]);

        match cli.command {
            Commands::Clean {
                drop,
                missing,
                dedupe,
                format,
                ..
            } => {
                assert_eq!(drop, vec!["a", "b"]);
                assert!(matches!(missing, Some(MissingChoice::Median)));
                assert!(dedupe);
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_constant_parsing() {
        assert_eq!(parse_constant("3"), Value::Integer(3));
        assert_eq!(parse_constant("0.5"), Value::Float(0.5));
        assert_eq!(parse_constant("unknown"), Value::Text("unknown".into()));
    }

    #[test]
    fn test_missing_and_fill_value_conflict() {
        let result = Cli::try_parse_from([
            "scour",
            "clean",
            "data.csv",
            "--missing",
            "drop",
            "--fill-value",
            "0",
        ]);
        assert!(result.is_err());
    }
}
