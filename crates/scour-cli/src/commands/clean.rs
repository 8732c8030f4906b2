//! Clean command - apply cleaning steps and write the cleaned data.

use std::path::PathBuf;

use colored::Colorize;
use scour::{
    write_table, Augmentor, FillMethod, MissingStrategy, Operation, OutputFormat, Recipe,
};

use crate::cli::{parse_constant, MissingChoice};

/// Arguments of the clean command.
pub struct CleanArgs {
    pub file: PathBuf,
    pub recipe: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub drop: Vec<String>,
    pub missing: Option<MissingChoice>,
    pub fill_value: Option<String>,
    pub dedupe: bool,
    pub impute: bool,
    pub remove_outliers: bool,
    pub contamination: f64,
    pub history: Option<PathBuf>,
}

pub fn run(args: CleanArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, meta) = super::load(&args.file)?;

    let recipe = match &args.recipe {
        Some(path) => Recipe::load(path)?,
        None => recipe_from_flags(&args),
    };

    if recipe.operations.is_empty() {
        println!("{} No cleaning steps requested.", "Warning:".yellow().bold());
        println!(
            "Run {} to see what could be done.",
            format!("scour suggest {}", args.file.display()).cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} step(s) to {}",
        "Applying".cyan().bold(),
        recipe.operations.len().to_string().white().bold(),
        meta.file.white()
    );
    if verbose {
        for op in &recipe.operations {
            println!("  {} {}", "-".dimmed(), op.description().dimmed());
        }
    }

    let mut engine = Augmentor::new(&table);
    let outcome = engine.apply_recipe(&recipe);

    println!();
    for entry in engine.changes_log() {
        let line = if entry.starts_with("Failed") {
            entry.red()
        } else {
            entry.green()
        };
        println!("  {}", line);
    }
    outcome?;

    let format = args
        .format
        .or_else(|| args.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();

    let output_path = args.output.clone().unwrap_or_else(|| {
        let stem = args.file.file_stem().unwrap_or_default().to_string_lossy();
        args.file
            .with_file_name(format!("{}_cleaned.{}", stem, format.extension()))
    });

    write_table(engine.cleaned_data(), &output_path, format)?;

    let record = engine.cleaner().history(&table);
    println!();
    println!(
        "{} {} ({} → {} rows, {} → {} columns)",
        "Saved".green().bold(),
        output_path.display().to_string().cyan(),
        record.original_shape.0,
        record.cleaned_shape.0,
        record.original_shape.1,
        record.cleaned_shape.1
    );

    if let Some(path) = &args.history {
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        println!("{} {}", "History:".dimmed(), path.display());
    }

    Ok(())
}

/// Build a recipe from the individual flags, in a fixed order: drop, missing
/// values, duplicates, imputation, outliers.
fn recipe_from_flags(args: &CleanArgs) -> Recipe {
    let mut operations = Vec::new();

    if !args.drop.is_empty() {
        operations.push(Operation::DropColumns {
            columns: args.drop.clone(),
        });
    }

    let strategy = match (&args.missing, &args.fill_value) {
        (_, Some(raw)) => Some(MissingStrategy::Fill(FillMethod::Constant(parse_constant(raw)))),
        (Some(choice), None) => Some(choice.strategy()),
        (None, None) => None,
    };
    if let Some(strategy) = strategy {
        operations.push(Operation::HandleMissing {
            strategy,
            columns: None,
        });
    }

    if args.dedupe {
        operations.push(Operation::RemoveDuplicates {
            subset: None,
            keep: Default::default(),
        });
    }

    if args.impute {
        operations.push(Operation::SmartImpute { columns: None });
    }

    if args.remove_outliers {
        operations.push(Operation::RemoveOutliers {
            columns: None,
            contamination: args.contamination,
        });
    }

    Recipe::new(operations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CleanArgs {
        CleanArgs {
            file: PathBuf::from("data.csv"),
            recipe: None,
            output: None,
            format: None,
            drop: Vec::new(),
            missing: None,
            fill_value: None,
            dedupe: false,
            impute: false,
            remove_outliers: false,
            contamination: 0.05,
            history: None,
        }
    }

    #[test]
    fn test_no_flags_no_steps() {
        assert!(recipe_from_flags(&args()).operations.is_empty());
    }

    #[test]
    fn test_flags_build_ordered_recipe() {
        let mut a = args();
        a.drop = vec!["notes".into()];
        a.fill_value = Some("0".into());
        a.dedupe = true;
        a.remove_outliers = true;

        let ops = recipe_from_flags(&a).operations;
        assert_eq!(ops.len(), 4);
        assert!(matches!(ops[0], Operation::DropColumns { .. }));
        assert!(matches!(
            &ops[1],
            Operation::HandleMissing {
                strategy: MissingStrategy::Fill(FillMethod::Constant(scour::Value::Integer(0))),
                ..
            }
        ));
        assert!(matches!(ops[3], Operation::RemoveOutliers { .. }));
    }
}
