//! Goodness-of-fit testing for the normality gate.
//!
//! Two independent tests over a standardized (zero mean, unit variance)
//! sample: a one-sample Kolmogorov-Smirnov test against N(0,1) over the full
//! sample, and Shapiro-Wilk (Royston's AS R94 approximation) over a bounded
//! prefix, since the Shapiro-Wilk approximation carries a sample-size
//! ceiling. Normality is confirmed iff both p-values exceed the significance
//! threshold. The verdict is binary and inherits the usual large-sample
//! sensitivity of both tests.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::TailRiskError;
use crate::stats;
use crate::TailRiskResult;

/// Default significance threshold for both tests.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Shapiro-Wilk observation ceiling; larger samples are tested on their
/// first `SHAPIRO_WILK_CAP` observations.
pub const SHAPIRO_WILK_CAP: usize = 5000;

/// Outcome of the combined normality check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalityCheck {
    pub confirmed: bool,
    pub significance: f64,
    pub ks_statistic: f64,
    pub ks_p_value: f64,
    pub sw_statistic: f64,
    pub sw_p_value: f64,
    /// Observations actually used by Shapiro-Wilk after the cap.
    pub sw_observations: usize,
}

/// Run both tests on a standardized sample (any order; sorting happens
/// internally). Consumes the sample to avoid a second full-size allocation.
pub fn check_normality(
    standardized: Vec<f64>,
    significance: f64,
) -> TailRiskResult<NormalityCheck> {
    if !significance.is_finite() || significance <= 0.0 || significance >= 1.0 {
        return Err(TailRiskError::InvalidInput {
            field: "significance".into(),
            reason: "Significance level must be between 0 and 1 (exclusive)".into(),
        });
    }
    if standardized.len() < 3 {
        return Err(TailRiskError::InsufficientData(
            "At least 3 observations required for normality testing".into(),
        ));
    }

    let mut sample = standardized;

    // The Shapiro-Wilk prefix is taken before sorting so it stays an
    // unbiased subsample of the draw.
    let sw_observations = sample.len().min(SHAPIRO_WILK_CAP);
    let mut prefix = sample[..sw_observations].to_vec();
    stats::sort_in_place(&mut prefix);
    let (sw_statistic, sw_p_value) = shapiro_wilk(&prefix)?;

    stats::sort_in_place(&mut sample);
    let (ks_statistic, ks_p_value) = kolmogorov_smirnov(&sample);

    Ok(NormalityCheck {
        confirmed: ks_p_value > significance && sw_p_value > significance,
        significance,
        ks_statistic,
        ks_p_value,
        sw_statistic,
        sw_p_value,
        sw_observations,
    })
}

/// One-sample Kolmogorov-Smirnov statistic and asymptotic p-value against
/// the standard normal, over a **sorted** sample.
fn kolmogorov_smirnov(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len() as f64;
    let std_normal = Normal::standard();

    let mut d: f64 = 0.0;
    for (i, &z) in sorted.iter().enumerate() {
        let f = std_normal.cdf(z);
        let d_plus = (i + 1) as f64 / n - f;
        let d_minus = f - i as f64 / n;
        d = d.max(d_plus).max(d_minus);
    }

    // Stephens' finite-sample adjustment of the asymptotic distribution
    let sqrt_n = n.sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    (d, ks_survival(lambda))
}

/// Kolmogorov distribution survival function Q(lambda).
fn ks_survival(lambda: f64) -> f64 {
    // Below this the alternating series is useless and Q is 1 to 5+ digits
    if lambda < 0.3 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = (-2.0 * (k as f64 * lambda).powi(2)).exp();
        sum += sign * term;
        if term < 1e-16 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

// Royston (1995) AS R94 polynomial coefficients, ascending order.
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

fn poly(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Shapiro-Wilk W statistic and p-value (AS R94) over a **sorted** sample of
/// 3 to `SHAPIRO_WILK_CAP` observations.
fn shapiro_wilk(sorted: &[f64]) -> TailRiskResult<(f64, f64)> {
    let n = sorted.len();
    if n < 3 {
        return Err(TailRiskError::InsufficientData(
            "Shapiro-Wilk requires at least 3 observations".into(),
        ));
    }
    if n > SHAPIRO_WILK_CAP {
        return Err(TailRiskError::InvalidInput {
            field: "sample".into(),
            reason: format!("Shapiro-Wilk is limited to {SHAPIRO_WILK_CAP} observations"),
        });
    }

    let range = sorted[n - 1] - sorted[0];
    if range < 1e-19 {
        return Err(TailRiskError::InsufficientData(
            "Zero-range sample has no normality verdict".into(),
        ));
    }

    let std_normal = Normal::standard();
    let an = n as f64;
    let nn2 = n / 2;

    // Lower-half weights, 1-based as in the reference algorithm; the full
    // coefficient vector is antisymmetric around the median.
    let mut a = vec![0.0_f64; nn2 + 1];
    if n == 3 {
        a[1] = std::f64::consts::FRAC_1_SQRT_2;
    } else {
        let mut m = vec![0.0_f64; nn2 + 1];
        let mut summ2 = 0.0;
        for (i, slot) in m.iter_mut().enumerate().skip(1) {
            *slot = std_normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25));
            summ2 += *slot * *slot;
        }
        summ2 *= 2.0;
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();
        let a1 = poly(&C1, rsn) - m[1] / ssumm2;

        let (i1, fac) = if n > 5 {
            let a2 = -m[2] / ssumm2 + poly(&C2, rsn);
            a[2] = a2;
            let fac = ((summ2 - 2.0 * m[1] * m[1] - 2.0 * m[2] * m[2])
                / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
                .sqrt();
            (3, fac)
        } else {
            let fac = ((summ2 - 2.0 * m[1] * m[1]) / (1.0 - 2.0 * a1 * a1)).sqrt();
            (2, fac)
        };
        a[1] = a1;
        for i in i1..=nn2 {
            a[i] = -m[i] / fac;
        }
    }

    // W is the squared correlation between the data and the coefficients.
    // Data are scaled by the range to keep the sums tame; the coefficient
    // vector sums to zero exactly, so only the data need centering.
    let sx = sorted.iter().map(|x| x / range).sum::<f64>() / an;
    let mut ssx = 0.0;
    let mut ssa = 0.0;
    let mut sax = 0.0;
    for (i, &x) in sorted.iter().enumerate() {
        let rank = i + 1;
        let c = if rank <= nn2 {
            -a[rank]
        } else if n + 1 - rank <= nn2 {
            a[n + 1 - rank]
        } else {
            0.0
        };
        let xd = x / range - sx;
        ssx += xd * xd;
        ssa += c * c;
        sax += c * xd;
    }

    // (1 - W) directly, to keep precision when W is very near 1
    let ssassx = (ssa * ssx).sqrt();
    let w1 = ((ssassx - sax) * (ssassx + sax) / (ssa * ssx)).max(1e-99);
    let w = 1.0 - w1;

    if n == 3 {
        let pi6 = 1.909_859_317_102_744; // 6/pi
        let stqr = 1.047_197_551_196_598; // asin(sqrt(3/4))
        let pw = (pi6 * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0);
        return Ok((w, pw));
    }

    let y = w1.ln();
    let pw = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            1e-99
        } else {
            let y = -(gamma - y).ln();
            let m = poly(&C3, an);
            let s = poly(&C4, an).exp();
            upper_tail((y - m) / s)
        }
    } else {
        let u = an.ln();
        let m = poly(&C5, u);
        let s = poly(&C6, u).exp();
        upper_tail((y - m) / s)
    };

    Ok((w, pw))
}

fn upper_tail(z: f64) -> f64 {
    1.0 - Normal::standard().cdf(z)
}
