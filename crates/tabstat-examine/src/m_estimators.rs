//! Robust M-estimators of location
//!
//! Each estimator solves `Σ wᵢ ψ((xᵢ − T) / s) = 0` by iteratively reweighted
//! least squares. The location starts at the weighted median and the scale
//! `s` is the weighted median absolute deviation about it, held fixed across
//! iterations. Every step replaces `T` with the mean of the data weighted by
//! `wᵢ · ψ(u)/u`; iteration stops once `|ΔT| ≤ tolerance · s` or after
//! `max_iterations` steps.
//!
//! | Estimator | ψ | Default constants |
//! |-----------|---|-------------------|
//! | Huber | clipped linear | `k = 1.339` |
//! | Tukey biweight | `u(1 − (u/c)²)²` on `|u| ≤ c` | `c = 4.685` |
//! | Hampel | three-part redescending | `a = 1.7, b = 3.4, c = 8.5` |
//! | Andrews wave | `a·sin(u/a)` on `|u| ≤ aπ` | `a = 1.339` |

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tabstat_core::{Error, Result};
use tabstat_quantile::weighted_median;

/// An M-estimator weight function with its tuning constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MEstimator {
    Huber { k: f64 },
    Tukey { c: f64 },
    Hampel { a: f64, b: f64, c: f64 },
    Andrews { a: f64 },
}

impl MEstimator {
    pub const HUBER: Self = Self::Huber { k: 1.339 };
    pub const TUKEY: Self = Self::Tukey { c: 4.685 };
    pub const HAMPEL: Self = Self::Hampel {
        a: 1.7,
        b: 3.4,
        c: 8.5,
    };
    pub const ANDREWS: Self = Self::Andrews { a: 1.339 };

    pub fn name(&self) -> &'static str {
        match self {
            Self::Huber { .. } => "huber",
            Self::Tukey { .. } => "tukey",
            Self::Hampel { .. } => "hampel",
            Self::Andrews { .. } => "andrews",
        }
    }

    /// IRLS weight `ψ(u)/u`, equal to 1 at `u = 0`
    pub fn weight(&self, u: f64) -> f64 {
        let a_u = u.abs();
        match *self {
            Self::Huber { k } => {
                if a_u <= k {
                    1.0
                } else {
                    k / a_u
                }
            }
            Self::Tukey { c } => {
                if a_u <= c {
                    let r = 1.0 - (u / c).powi(2);
                    r * r
                } else {
                    0.0
                }
            }
            Self::Hampel { a, b, c } => {
                if a_u <= a {
                    1.0
                } else if a_u <= b {
                    a / a_u
                } else if a_u <= c {
                    a * (c - a_u) / ((c - b) * a_u)
                } else {
                    0.0
                }
            }
            Self::Andrews { a } => {
                if a_u == 0.0 {
                    1.0
                } else if a_u <= a * PI {
                    (u / a).sin() / (u / a)
                } else {
                    0.0
                }
            }
        }
    }

    /// Check the tuning constants
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Huber { k } => k > 0.0,
            Self::Tukey { c } => c > 0.0,
            Self::Hampel { a, b, c } => 0.0 < a && a <= b && b < c,
            Self::Andrews { a } => a > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "Invalid tuning constants for {} estimator: {:?}",
                self.name(),
                self
            )))
        }
    }
}

/// Iteration limits shared by the M-estimators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MEstimatorConfig {
    pub enabled: bool,
    pub max_iterations: usize,
    /// Convergence threshold relative to the scale
    pub tolerance: f64,
}

impl Default for MEstimatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_iterations: 50,
            tolerance: 1e-6,
        }
    }
}

impl MEstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "M-estimator max_iterations must be positive".to_string(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "M-estimator tolerance {} must be positive",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Outcome of one M-estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MEstimate {
    pub estimate: Option<f64>,
    pub iterations: usize,
    pub converged: bool,
}

impl MEstimate {
    fn undefined() -> Self {
        Self {
            estimate: None,
            iterations: 0,
            converged: false,
        }
    }
}

/// Weighted median absolute deviation about `center`
pub fn weighted_mad(values: &[f64], weights: &[f64], center: f64) -> Option<f64> {
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    weighted_median(&deviations, weights)
}

/// Run IRLS for one estimator over weighted data
pub fn m_estimate(
    estimator: MEstimator,
    values: &[f64],
    weights: &[f64],
    config: &MEstimatorConfig,
) -> MEstimate {
    let Some(median) = weighted_median(values, weights) else {
        return MEstimate::undefined();
    };
    let Some(scale) = weighted_mad(values, weights, median).filter(|s| *s > 0.0) else {
        return MEstimate {
            estimate: Some(median),
            iterations: 0,
            converged: true,
        };
    };

    let mut location = median;
    for iteration in 1..=config.max_iterations {
        let (mut num, mut den) = (0.0, 0.0);
        for (&x, &w) in values.iter().zip(weights) {
            let psi_weight = w * estimator.weight((x - location) / scale);
            num += psi_weight * x;
            den += psi_weight;
        }
        if den <= 0.0 {
            return MEstimate {
                estimate: Some(location),
                iterations: iteration,
                converged: false,
            };
        }
        let next = num / den;
        let step = (next - location).abs();
        location = next;
        if step <= config.tolerance * scale {
            return MEstimate {
                estimate: Some(location),
                iterations: iteration,
                converged: true,
            };
        }
    }
    MEstimate {
        estimate: Some(location),
        iterations: config.max_iterations,
        converged: false,
    }
}

/// The four standard M-estimates of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MEstimates {
    pub huber: MEstimate,
    pub tukey: MEstimate,
    pub hampel: MEstimate,
    pub andrews: MEstimate,
}

impl MEstimates {
    pub fn compute(values: &[f64], weights: &[f64], config: &MEstimatorConfig) -> Self {
        let run = |estimator| m_estimate(estimator, values, weights, config);
        Self {
            huber: run(MEstimator::HUBER),
            tukey: run(MEstimator::TUKEY),
            hampel: run(MEstimator::HAMPEL),
            andrews: run(MEstimator::ANDREWS),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MEstimate)> {
        [
            ("huber", &self.huber),
            ("tukey", &self.tukey),
            ("hampel", &self.hampel),
            ("andrews", &self.andrews),
        ]
        .into_iter()
    }
}
