//! Weighted order statistics
//!
//! Case weights are treated as replication counts: a case with weight 3
//! occupies three consecutive ranks. Fractional weights occupy fractional
//! stretches of the rank axis, so the same definitions apply unchanged.

use crate::method::PercentileMethod;
use serde::{Deserialize, Serialize};
use tabstat_core::{Error, Result};

/// Rank tolerance when deciding whether a position falls exactly on a rank
const RANK_EPSILON: f64 = 1e-9;

/// Sorted values with cumulative weights
#[derive(Debug, Clone)]
pub struct CumulativeSample {
    values: Vec<f64>,
    cumulative: Vec<f64>,
}

impl CumulativeSample {
    /// Build from `(value, weight)` pairs already sorted by value
    pub fn from_sorted(pairs: &[(f64, f64)]) -> Self {
        let mut running = 0.0;
        let mut values = Vec::with_capacity(pairs.len());
        let mut cumulative = Vec::with_capacity(pairs.len());
        for &(x, w) in pairs {
            running += w;
            values.push(x);
            cumulative.push(running);
        }
        Self { values, cumulative }
    }

    /// Build from unsorted values and weights
    pub fn new(values: &[f64], weights: &[f64]) -> Self {
        let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self::from_sorted(&pairs)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total weight
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value occupying rank `r` (1-based); ranks below 1 clamp to the
    /// smallest value and ranks beyond the total weight to the largest
    pub fn at_rank(&self, r: f64) -> Option<f64> {
        let first = *self.values.first()?;
        if r <= RANK_EPSILON {
            return Some(first);
        }
        let idx = self.cumulative.partition_point(|&c| c < r - RANK_EPSILON);
        Some(self.values.get(idx).copied().unwrap_or_else(|| self.values[self.values.len() - 1]))
    }

    /// Linear interpolation between the order statistics around position `t`
    pub fn interpolate(&self, t: f64) -> Option<f64> {
        let i = t.floor();
        let g = t - i;
        let lower = self.at_rank(i)?;
        if g < RANK_EPSILON {
            return Some(lower);
        }
        let upper = self.at_rank(i + 1.0)?;
        Some((1.0 - g) * lower + g * upper)
    }

    /// Percentile `p` in `[0, 1]` under the given definition
    pub fn percentile(&self, p: f64, method: PercentileMethod) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let w = self.total();
        match method {
            PercentileMethod::Haverage => self.interpolate((w + 1.0) * p),
            PercentileMethod::Waverage => self.interpolate(w * p),
            PercentileMethod::Round => self.at_rank((w * p + 0.5).floor()),
            PercentileMethod::Empirical | PercentileMethod::Aempirical => {
                let t = w * p;
                let i = t.floor();
                if t - i > RANK_EPSILON {
                    self.at_rank(i + 1.0)
                } else if method == PercentileMethod::Empirical {
                    self.at_rank(i)
                } else {
                    Some((self.at_rank(i)? + self.at_rank(i + 1.0)?) / 2.0)
                }
            }
        }
    }

    /// Weighted median under the interpolated (HAVERAGE) definition
    pub fn median(&self) -> Option<f64> {
        self.percentile(0.5, PercentileMethod::Haverage)
    }

    /// Percentiles given on the 0-100 scale, paired with their values
    pub fn percentile_table(&self, percentiles: &[f64], method: PercentileMethod) -> Vec<PercentileValue> {
        percentiles
            .iter()
            .map(|&p| PercentileValue {
                percentile: p,
                value: self.percentile(p / 100.0, method),
            })
            .collect()
    }
}

/// A percentile on the 0-100 scale and its value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value: Option<f64>,
}

/// Check a percentile expressed on the 0-100 scale
pub fn check_percentile(p: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::invalid_percentile(p));
    }
    Ok(())
}

/// Percentiles (0-100 scale) of weighted data
pub fn weighted_percentiles(
    values: &[f64],
    weights: &[f64],
    percentiles: &[f64],
    method: PercentileMethod,
) -> Result<Vec<Option<f64>>> {
    for &p in percentiles {
        check_percentile(p)?;
    }
    let sample = CumulativeSample::new(values, weights);
    Ok(percentiles
        .iter()
        .map(|&p| sample.percentile(p / 100.0, method))
        .collect())
}

/// Weighted median, `None` for empty data
pub fn weighted_median(values: &[f64], weights: &[f64]) -> Option<f64> {
    CumulativeSample::new(values, weights).median()
}
