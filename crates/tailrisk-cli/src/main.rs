mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::estimate::{EstimateArgs, TheoreticalArgs};
use commands::normality::NormalityArgs;
use commands::study::StudyArgs;

/// Value-at-Risk and Expected Shortfall estimation
#[derive(Parser)]
#[command(
    name = "trk",
    version,
    about = "Value-at-Risk and Expected Shortfall estimation",
    long_about = "A CLI for computing Value-at-Risk and Expected Shortfall three ways \
                  (closed form, parametric-normal, empirical) and running seeded \
                  convergence studies in which the parametric estimate is gated \
                  behind Kolmogorov-Smirnov and Shapiro-Wilk normality tests."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seeded convergence study across sample sizes
    Study(StudyArgs),
    /// Closed-form VaR/ES for a known distribution
    Theoretical(TheoreticalArgs),
    /// Empirical and parametric-normal VaR/ES from observed data
    Estimate(EstimateArgs),
    /// Kolmogorov-Smirnov and Shapiro-Wilk normality check
    Normality(NormalityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Study(args) => commands::study::run_study(args),
        Commands::Theoretical(args) => commands::estimate::run_theoretical(args),
        Commands::Estimate(args) => commands::estimate::run_estimate(args),
        Commands::Normality(args) => commands::normality::run_normality(args),
        Commands::Version => {
            println!("trk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
