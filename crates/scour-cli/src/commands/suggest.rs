//! Suggest command - advisory cleaning steps.

use std::path::PathBuf;

use colored::Colorize;
use scour::{Augmentor, SuggestionKind};

pub fn run(file: PathBuf, json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, meta) = super::load(&file)?;
    let suggestions = Augmentor::new(&table).suggest_cleaning();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!("{} {}", "Suggestions for".cyan().bold(), meta.file.white());
    println!();

    if suggestions.is_empty() {
        println!("{}", "Nothing to suggest.".green());
        return Ok(());
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        let flag = match suggestion.action {
            SuggestionKind::HandleMissing => "--missing auto",
            SuggestionKind::RemoveDuplicates => "--dedupe",
            SuggestionKind::CheckOutliers => "--remove-outliers",
        };

        println!(
            "{}. {} {}",
            i + 1,
            suggestion.action.label().yellow().bold(),
            suggestion.message
        );
        if !suggestion.columns.is_empty() {
            println!("   {} {}", "Columns:".dimmed(), suggestion.columns.join(", "));
        }
        println!(
            "   {} {}",
            "Try:".dimmed(),
            format!("scour clean {} {}", file.display(), flag).cyan()
        );
    }

    Ok(())
}
