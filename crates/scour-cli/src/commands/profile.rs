//! Profile command - column types, missing values and statistics.

use std::path::PathBuf;

use colored::Colorize;
use scour::TableProfile;

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, meta) = super::load(&file)?;
    let profile = TableProfile::from_table(&table);

    if json_output {
        let out = serde_json::json!({
            "source": meta,
            "profile": profile,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} {}", "Profile of".cyan().bold(), meta.file.white());
    if verbose {
        println!("  {} {}", "Hash:".dimmed(), meta.hash.dimmed());
    }
    println!(
        "  {} rows, {} columns, {} missing cells, {} duplicate rows",
        profile.rows.to_string().white().bold(),
        profile.columns.to_string().white().bold(),
        colored_count(profile.total_missing),
        colored_count(profile.duplicate_rows),
    );
    println!();

    println!(
        "{:<24} {:<10} {:>9} {:>8}  {}",
        "Column".bold(),
        "Type".bold(),
        "Missing".bold(),
        "Unique".bold(),
        "Summary".bold()
    );

    for column in &profile.column_profiles {
        let summary = match &column.numeric {
            Some(n) => format!("min {:.2}  mean {:.2}  max {:.2}", n.min, n.mean, n.max),
            None => column
                .top_values
                .iter()
                .take(3)
                .map(|(v, c)| format!("{} ({})", v, c))
                .collect::<Vec<_>>()
                .join(", "),
        };

        let missing = format!("{} ({:.0}%)", column.missing, column.missing_pct);
        let missing = if column.missing > 0 {
            missing.yellow()
        } else {
            missing.normal()
        };

        println!(
            "{:<24} {:<10} {:>9} {:>8}  {}",
            column.name,
            column.dtype.to_string().blue(),
            missing,
            column.unique,
            summary.dimmed()
        );
    }

    Ok(())
}

fn colored_count(n: usize) -> colored::ColoredString {
    if n > 0 {
        n.to_string().yellow().bold()
    } else {
        n.to_string().green()
    }
}
