use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tailrisk_core::estimator::var_es::{
    empirical_var_es, parametric_normal_var_es, theoretical_var_es, EstimatePair,
};

use crate::input;

/// Arguments for closed-form VaR/ES
#[derive(Args)]
pub struct TheoreticalArgs {
    /// Distribution: normal or exponential
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
}

/// Arguments for sample-based VaR/ES
#[derive(Args)]
pub struct EstimateArgs {
    /// Path to a JSON file with observations (array, or object with a
    /// 'values' array)
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated observations (e.g. "0.5,-1.2,0.3")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<f64>>,

    /// Confidence level (e.g. 0.99 for 99%)
    #[arg(long, default_value_t = 0.99)]
    pub alpha: f64,

    /// Estimation method: empirical, parametric, or both
    #[arg(long, default_value = "both")]
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EstimateOutput {
    alpha: f64,
    observations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    empirical: Option<EstimatePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parametric: Option<EstimatePair>,
}

pub fn run_theoretical(args: TheoreticalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spec = super::parse_distribution(&args.distribution, args.mean, args.std_dev, args.rate)?;
    let pair = theoretical_var_es(&spec, args.alpha)?;
    Ok(serde_json::to_value(pair)?)
}

pub fn run_estimate(args: EstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let values = input::load_values(&args.input, &args.values)?;

    let (want_empirical, want_parametric) = match args.method.to_lowercase().as_str() {
        "empirical" => (true, false),
        "parametric" => (false, true),
        "both" => (true, true),
        other => {
            return Err(
                format!("Unknown method '{other}'. Use: empirical, parametric, both").into(),
            )
        }
    };

    let empirical = if want_empirical {
        let mut data = values.clone();
        Some(empirical_var_es(&mut data, args.alpha)?)
    } else {
        None
    };
    let parametric = if want_parametric {
        Some(parametric_normal_var_es(&values, args.alpha)?)
    } else {
        None
    };

    let output = EstimateOutput {
        alpha: args.alpha,
        observations: values.len(),
        empirical,
        parametric,
    };
    Ok(serde_json::to_value(output)?)
}
