//! Outliers command - flag anomalous rows without changing the file.

use std::path::PathBuf;

use colored::Colorize;
use scour::Augmentor;

pub fn run(
    file: PathBuf,
    columns: Vec<String>,
    contamination: f64,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (table, meta) = super::load(&file)?;
    let mut engine = Augmentor::new(&table);

    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    let selection = if names.is_empty() { None } else { Some(names.as_slice()) };
    let mask = engine.detect_outliers(selection, contamination)?;

    if json_output {
        let out = serde_json::json!({
            "file": meta.file,
            "columns": mask.columns,
            "contamination": contamination,
            "outlier_rows": mask.rows(),
            "scores": mask.scores,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if mask.is_empty() {
        println!("{} No numeric columns to check.", "Warning:".yellow().bold());
        return Ok(());
    }

    println!(
        "{} {} of {} rows in {} (columns: {})",
        "Flagged".cyan().bold(),
        mask.count().to_string().white().bold(),
        table.row_count(),
        meta.file.white(),
        mask.columns.join(", ")
    );

    let rows = mask.rows();
    let shown = if verbose { rows.len() } else { rows.len().min(20) };
    for &row in &rows[..shown] {
        let values: Vec<String> = mask
            .columns
            .iter()
            .filter_map(|name| table.column(name))
            .map(|c| format!("{}={}", c.name(), c.values()[row]))
            .collect();
        println!(
            "  row {:>6}  score {:.3}  {}",
            row,
            mask.scores[row],
            values.join("  ").dimmed()
        );
    }
    if shown < rows.len() {
        println!("  ... {} more (use --verbose to list all)", rows.len() - shown);
    }

    Ok(())
}
