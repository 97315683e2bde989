pub mod estimate;
pub mod normality;
pub mod study;

use tailrisk_core::simulate::DistributionSpec;

/// Resolve the `--distribution` preset together with its parameter flags.
pub(crate) fn parse_distribution(
    name: &str,
    mean: f64,
    std_dev: f64,
    rate: f64,
) -> Result<DistributionSpec, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "normal" => Ok(DistributionSpec::Normal { mean, std_dev }),
        "exponential" | "exp" => Ok(DistributionSpec::Exponential { rate }),
        other => Err(format!("Unknown distribution '{other}'. Use: normal, exponential").into()),
    }
}
