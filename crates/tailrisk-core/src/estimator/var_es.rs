//! Value-at-Risk and Expected Shortfall, three ways: closed form for a known
//! distribution, parametric-normal from sample moments, and empirical from
//! order statistics.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::TailRiskError;
use crate::simulate::DistributionSpec;
use crate::stats;
use crate::TailRiskResult;

/// A (VaR, ES) pair. VaR is the alpha-quantile; ES is the conditional mean
/// of values at or beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatePair {
    pub var: f64,
    pub es: f64,
}

/// Componentwise deviation of an estimate pair from the theoretical pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub var_abs: f64,
    pub es_abs: f64,
    pub var_pct: f64,
    pub es_pct: f64,
}

pub(crate) fn validate_alpha(alpha: f64) -> TailRiskResult<()> {
    if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(TailRiskError::InvalidInput {
            field: "alpha".into(),
            reason: "Confidence level must be between 0 and 1 (exclusive)".into(),
        });
    }
    Ok(())
}

/// Normal tail formulas shared by the theoretical and parametric estimators:
/// VaR = mu + sigma * qnorm(alpha), ES = mu + sigma * dnorm(qnorm(alpha)) / (1 - alpha).
fn normal_tail(mean: f64, std_dev: f64, alpha: f64) -> EstimatePair {
    let std_normal = Normal::standard();
    let z = std_normal.inverse_cdf(alpha);
    EstimatePair {
        var: mean + std_dev * z,
        es: mean + std_dev * std_normal.pdf(z) / (1.0 - alpha),
    }
}

/// Closed-form VaR/ES for a known distribution. Pure: identical inputs give
/// bit-identical output.
pub fn theoretical_var_es(spec: &DistributionSpec, alpha: f64) -> TailRiskResult<EstimatePair> {
    validate_alpha(alpha)?;
    match spec {
        DistributionSpec::Normal { mean, std_dev } => {
            if !(std_dev.is_finite() && *std_dev > 0.0) {
                return Err(TailRiskError::InvalidInput {
                    field: "std_dev".into(),
                    reason: "Standard deviation must be positive".into(),
                });
            }
            Ok(normal_tail(*mean, *std_dev, alpha))
        }
        DistributionSpec::Exponential { rate } => {
            if !(rate.is_finite() && *rate > 0.0) {
                return Err(TailRiskError::InvalidInput {
                    field: "rate".into(),
                    reason: "Rate must be positive".into(),
                });
            }
            // Memoryless closed form: ES sits exactly one mean above VaR
            let var = -(1.0 - alpha).ln() / rate;
            Ok(EstimatePair {
                var,
                es: var + 1.0 / rate,
            })
        }
    }
}

/// VaR/ES assuming the sample is normal, fitted by population moments.
///
/// Does not validate the normality assumption; callers gate this behind
/// [`crate::normality::check_normality`] when the semantics require it.
pub fn parametric_normal_var_es(sample: &[f64], alpha: f64) -> TailRiskResult<EstimatePair> {
    validate_alpha(alpha)?;
    if sample.len() < 2 {
        return Err(TailRiskError::InsufficientData(
            "At least 2 observations required for a parametric fit".into(),
        ));
    }
    let mu = stats::mean(sample);
    let sigma = stats::population_std(sample, mu);
    Ok(normal_tail(mu, sigma, alpha))
}

/// Assumption-free VaR/ES from order statistics. Sorts the sample in place.
///
/// VaR is the linear-interpolation percentile at rank (n-1) * alpha; ES is
/// the mean of all elements `>= VaR` (inclusive tail policy, so a sample of
/// size 1 yields that value for both).
pub fn empirical_var_es(sample: &mut [f64], alpha: f64) -> TailRiskResult<EstimatePair> {
    validate_alpha(alpha)?;
    if sample.is_empty() {
        return Err(TailRiskError::InsufficientData(
            "At least 1 observation required for an empirical estimate".into(),
        ));
    }

    stats::sort_in_place(sample);
    let var = stats::percentile_sorted(sample, alpha * 100.0);

    // The interpolated quantile never exceeds the maximum, so the tail is
    // nonempty.
    let tail_start = sample.partition_point(|&v| v < var);
    let es = stats::mean(&sample[tail_start..]);

    Ok(EstimatePair { var, es })
}

/// Absolute and percentage deviation of `estimate` from `theoretical`,
/// componentwise.
pub fn compute_errors(
    theoretical: &EstimatePair,
    estimate: &EstimatePair,
) -> TailRiskResult<ErrorMetrics> {
    if theoretical.var == 0.0 {
        return Err(TailRiskError::DivisionByZero {
            context: "percentage error (theoretical VaR is zero)".into(),
        });
    }
    if theoretical.es == 0.0 {
        return Err(TailRiskError::DivisionByZero {
            context: "percentage error (theoretical ES is zero)".into(),
        });
    }

    let var_abs = (estimate.var - theoretical.var).abs();
    let es_abs = (estimate.es - theoretical.es).abs();
    Ok(ErrorMetrics {
        var_abs,
        es_abs,
        var_pct: var_abs / theoretical.var.abs() * 100.0,
        es_pct: es_abs / theoretical.es.abs() * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHA: f64 = 0.99;

    #[test]
    fn test_theoretical_standard_normal_tabulated() {
        let spec = DistributionSpec::Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        let pair = theoretical_var_es(&spec, ALPHA).unwrap();
        assert!((pair.var - 2.3263).abs() < 5e-5, "var={}", pair.var);
        assert!((pair.es - 2.6652).abs() < 5e-5, "es={}", pair.es);
    }

    #[test]
    fn test_theoretical_normal_location_scale() {
        let spec = DistributionSpec::Normal {
            mean: 2.0,
            std_dev: 3.0,
        };
        let base = theoretical_var_es(
            &DistributionSpec::Normal {
                mean: 0.0,
                std_dev: 1.0,
            },
            ALPHA,
        )
        .unwrap();
        let pair = theoretical_var_es(&spec, ALPHA).unwrap();
        assert!((pair.var - (2.0 + 3.0 * base.var)).abs() < 1e-12);
        assert!((pair.es - (2.0 + 3.0 * base.es)).abs() < 1e-12);
    }

    #[test]
    fn test_theoretical_exponential_unit_rate() {
        let spec = DistributionSpec::Exponential { rate: 1.0 };
        let pair = theoretical_var_es(&spec, ALPHA).unwrap();
        assert!((pair.var - 4.6052).abs() < 5e-5, "var={}", pair.var);
        assert!((pair.es - 5.6052).abs() < 5e-5, "es={}", pair.es);
    }

    #[test]
    fn test_theoretical_is_idempotent() {
        let spec = DistributionSpec::Exponential { rate: 4.0 };
        let a = theoretical_var_es(&spec, ALPHA).unwrap();
        let b = theoretical_var_es(&spec, ALPHA).unwrap();
        assert_eq!(a.var.to_bits(), b.var.to_bits());
        assert_eq!(a.es.to_bits(), b.es.to_bits());
    }

    #[test]
    fn test_alpha_outside_open_interval_rejected() {
        let spec = DistributionSpec::Exponential { rate: 4.0 };
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(theoretical_var_es(&spec, bad).is_err(), "alpha={bad}");
        }
    }

    #[test]
    fn test_empirical_handcrafted_sample() {
        let mut sample: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let pair = empirical_var_es(&mut sample, ALPHA).unwrap();
        // 99th percentile of [1..100] interpolates between 99 and 100
        assert!((pair.var - 99.01).abs() < 1e-10, "var={}", pair.var);
        // Only 100 satisfies value >= 99.01
        assert!((pair.es - 100.0).abs() < 1e-10, "es={}", pair.es);
    }

    #[test]
    fn test_empirical_unordered_input() {
        let mut sample: Vec<f64> = (1..=100).rev().map(|i| i as f64).collect();
        let pair = empirical_var_es(&mut sample, ALPHA).unwrap();
        assert!((pair.var - 99.01).abs() < 1e-10);
    }

    #[test]
    fn test_empirical_inclusive_tail_on_ties() {
        // VaR lands exactly on a repeated order statistic; every copy is
        // included under the >= policy.
        let mut sample = vec![1.0, 2.0, 3.0, 3.0, 3.0];
        let pair = empirical_var_es(&mut sample, 0.5).unwrap();
        assert_eq!(pair.var, 3.0);
        assert_eq!(pair.es, 3.0);
    }

    #[test]
    fn test_empirical_single_observation() {
        let mut sample = vec![7.5];
        let pair = empirical_var_es(&mut sample, ALPHA).unwrap();
        assert_eq!(pair.var, 7.5);
        assert_eq!(pair.es, 7.5);
    }

    #[test]
    fn test_empirical_empty_rejected() {
        let mut sample: Vec<f64> = vec![];
        assert!(empirical_var_es(&mut sample, ALPHA).is_err());
    }

    #[test]
    fn test_parametric_matches_theoretical_on_exact_moments() {
        // A symmetric two-point sample has mean 2 and population std 3
        let sample = vec![-1.0, 5.0];
        let pair = parametric_normal_var_es(&sample, ALPHA).unwrap();
        let theo = theoretical_var_es(
            &DistributionSpec::Normal {
                mean: 2.0,
                std_dev: 3.0,
            },
            ALPHA,
        )
        .unwrap();
        assert!((pair.var - theo.var).abs() < 1e-12);
        assert!((pair.es - theo.es).abs() < 1e-12);
    }

    #[test]
    fn test_parametric_requires_two_observations() {
        assert!(parametric_normal_var_es(&[1.0], ALPHA).is_err());
        assert!(parametric_normal_var_es(&[], ALPHA).is_err());
    }

    #[test]
    fn test_error_metrics() {
        let theo = EstimatePair { var: 10.0, es: 20.0 };
        let est = EstimatePair { var: 9.0, es: 22.0 };
        let errors = compute_errors(&theo, &est).unwrap();
        assert!((errors.var_abs - 1.0).abs() < 1e-12);
        assert!((errors.es_abs - 2.0).abs() < 1e-12);
        assert!((errors.var_pct - 10.0).abs() < 1e-12);
        assert!((errors.es_pct - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_error_metrics_zero_denominator() {
        let theo = EstimatePair { var: 0.0, es: 20.0 };
        let est = EstimatePair { var: 1.0, es: 20.0 };
        assert!(matches!(
            compute_errors(&theo, &est),
            Err(TailRiskError::DivisionByZero { .. })
        ));
    }
}
