//! Scour CLI - clean tabular data files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "scour=debug" } else { "scour=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile { file, json } => commands::profile::run(file, json, cli.verbose),

        Commands::Suggest { file, json } => commands::suggest::run(file, json, cli.verbose),

        Commands::Outliers {
            file,
            columns,
            contamination,
            json,
        } => commands::outliers::run(file, columns, contamination, json, cli.verbose),

        Commands::Clean {
            file,
            recipe,
            output,
            format,
            drop,
            missing,
            fill_value,
            dedupe,
            impute,
            remove_outliers,
            contamination,
            history,
        } => commands::clean::run(
            commands::clean::CleanArgs {
                file,
                recipe,
                output,
                format,
                drop,
                missing,
                fill_value,
                dedupe,
                impute,
                remove_outliers,
                contamination,
                history,
            },
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
