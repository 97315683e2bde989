use clap::Args;
use serde_json::Value;

use tailrisk_core::normality::gof::check_normality;
use tailrisk_core::stats;

use crate::input;

/// Arguments for the normality check
#[derive(Args)]
pub struct NormalityArgs {
    /// Path to a JSON file with observations (array, or object with a
    /// 'values' array)
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated observations
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<f64>>,

    /// Significance threshold for both tests
    #[arg(long, default_value_t = 0.05)]
    pub significance: f64,

    /// Treat the input as already standardized (skip the zero-mean /
    /// unit-variance transform)
    #[arg(long)]
    pub standardized: bool,
}

pub fn run_normality(args: NormalityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let values = input::load_values(&args.input, &args.values)?;

    let standardized = if args.standardized {
        values
    } else {
        let mean = stats::mean(&values);
        let std_dev = stats::population_std(&values, mean);
        if std_dev == 0.0 {
            return Err("Zero-variance input cannot be standardized".into());
        }
        stats::standardize(&values, mean, std_dev)
    };

    let check = check_normality(standardized, args.significance)?;
    Ok(serde_json::to_value(check)?)
}
