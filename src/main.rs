//! allure-data - Command-line tool for building Allure report data

use allure_report_data::commands::*;
use allure_report_data::ui::CliUI;
use clap::{Parser, Subcommand};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "allure-data")]
#[command(about = "Allure report data tool", long_about = None)]
struct Cli {
    /// Working directory holding .allure.conf (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    directory: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate report data from results directories
    Generate {
        /// Output directory (defaults to report_directory from .allure.conf)
        #[arg(short, long, env = "ALLURE_REPORT_DIRECTORY")]
        output: Option<String>,

        /// Results directories (override results_directories from .allure.conf)
        results: Vec<String>,
    },

    /// Validate suite result files against the result schema
    Validate {
        /// Results directories (override results_directories from .allure.conf)
        results: Vec<String>,
    },

    /// Show statistics of the results directories
    Stats {
        /// Results directories (override results_directories from .allure.conf)
        results: Vec<String>,
    },

    /// Remove a results or report directory
    Clean {
        /// Directory to remove
        directory: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();

    let mut ui = CliUI::new();

    let result = match cli.command {
        Commands::Generate { output, results } => {
            let cmd = match output {
                Some(output) => GenerateCommand::with_output(cli.directory, results, output),
                None => GenerateCommand::new(cli.directory, results),
            };
            cmd.execute(&mut ui)
        }
        Commands::Validate { results } => {
            let cmd = ValidateCommand::new(cli.directory, results);
            cmd.execute(&mut ui)
        }
        Commands::Stats { results } => {
            let cmd = StatsCommand::new(cli.directory, results);
            cmd.execute(&mut ui)
        }
        Commands::Clean { directory } => {
            let cmd = CleanCommand::new(directory);
            cmd.execute(&mut ui)
        }
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Error: {}", e);
            std::process::exit(1);
        }
    }
}
