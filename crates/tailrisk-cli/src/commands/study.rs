use clap::Args;
use serde_json::Value;

use tailrisk_core::study::convergence::{run_convergence_study, StudyInput};

use crate::input;

/// Arguments for a convergence study
#[derive(Args)]
pub struct StudyArgs {
    /// Path to a JSON input file (full study specification)
    #[arg(long)]
    pub input: Option<String>,

    /// Distribution preset: normal or exponential
    #[arg(long, default_value = "normal")]
    pub distribution: String,

    /// Mean of the normal distribution
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    pub mean: f64,

    /// Standard deviation of the normal distribution
    #[arg(long, default_value_t = 3.0)]
    pub std_dev: f64,

    /// Rate of the exponential distribution
    #[arg(long, default_value_t = 4.0)]
    pub rate: f64,

    /// Confidence level (e.g. 0.99 for 99%)
    #[arg(long, default_value_t = 0.99)]
    pub alpha: f64,

    /// Comma-separated sample sizes (default: 1e6,1e7,1e8)
    #[arg(long, value_delimiter = ',')]
    pub sizes: Option<Vec<usize>>,

    /// RNG seed reused for every sample size
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Significance threshold for the normality gate
    #[arg(long, default_value_t = 0.05)]
    pub significance: f64,
}

pub fn run_study(args: StudyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let study_input: StudyInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let distribution =
            super::parse_distribution(&args.distribution, args.mean, args.std_dev, args.rate)?;
        StudyInput {
            distribution,
            alpha: args.alpha,
            sample_sizes: args
                .sizes
                .clone()
                .unwrap_or_else(|| StudyInput::normal_benchmark().sample_sizes),
            seed: args.seed,
            significance: args.significance,
        }
    };

    let result = run_convergence_study(&study_input)?;
    Ok(serde_json::to_value(result)?)
}
