//! Weighted central moments with small-sample bias correction
//!
//! With case weights `wᵢ` and `W = Σwᵢ`:
//!
//! - mean `x̄ = Σwᵢxᵢ / W`
//! - `M2 = Σwᵢ(xᵢ−x̄)²`, `M3 = Σwᵢ(xᵢ−x̄)³`, `M4 = Σwᵢ(xᵢ−x̄)⁴`
//! - variance `M2 / (W−1)`
//! - skewness `W·M3 / ((W−1)(W−2)·s³)`
//! - kurtosis `[W(W+1)M4 − 3M2²(W−1)] / [(W−1)(W−2)(W−3)·s⁴]`
//!
//! Every accessor returns `None` when its minimum-N precondition fails, never
//! NaN or infinity.

use tabstat_core::VARIANCE_EPSILON;

/// First four weighted moments plus the range of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMoments {
    /// Total weight `W`
    pub weight: f64,
    pub mean: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
    /// `Σwᵢxᵢ`
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

impl WeightedMoments {
    /// Accumulate moments in two passes; `None` if there is no positive weight
    pub fn compute(values: &[f64], weights: &[f64]) -> Option<Self> {
        let (weight, sum) = values
            .iter()
            .zip(weights)
            .fold((0.0, 0.0), |(w, s), (&x, &wi)| (w + wi, s + wi * x));
        if values.is_empty() || weight <= 0.0 {
            return None;
        }
        let mean = sum / weight;

        let mut moments = Self {
            weight,
            mean,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            sum,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        for (&x, &w) in values.iter().zip(weights) {
            let d = x - mean;
            let d2 = d * d;
            moments.m2 += w * d2;
            moments.m3 += w * d2 * d;
            moments.m4 += w * d2 * d2;
            moments.min = moments.min.min(x);
            moments.max = moments.max.max(x);
        }
        Some(moments)
    }

    /// Unweighted convenience constructor
    pub fn unweighted(values: &[f64]) -> Option<Self> {
        Self::compute(values, &vec![1.0; values.len()])
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Sample variance, defined for `W > 1`
    pub fn variance(&self) -> Option<f64> {
        if self.weight <= 1.0 {
            return None;
        }
        finite(self.m2 / (self.weight - 1.0)).map(|v| v.max(0.0))
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn std_error_mean(&self) -> Option<f64> {
        self.std_dev().and_then(|sd| finite(sd / self.weight.sqrt()))
    }

    fn spread(&self) -> Option<f64> {
        self.variance()
            .filter(|v| *v > VARIANCE_EPSILON)
            .map(f64::sqrt)
    }

    /// Bias-corrected skewness, defined for `W > 2` and non-zero variance
    pub fn skewness(&self) -> Option<f64> {
        let w = self.weight;
        if w <= 2.0 {
            return None;
        }
        let sd = self.spread()?;
        finite(w * self.m3 / ((w - 1.0) * (w - 2.0) * sd.powi(3)))
    }

    /// Standard error of skewness, defined for `W > 2`
    pub fn skewness_std_error(&self) -> Option<f64> {
        skewness_std_error(self.weight)
    }

    /// Bias-corrected excess kurtosis, defined for `W > 3` and non-zero variance
    pub fn kurtosis(&self) -> Option<f64> {
        let w = self.weight;
        if w <= 3.0 {
            return None;
        }
        let sd = self.spread()?;
        let numerator = w * (w + 1.0) * self.m4 - 3.0 * self.m2 * self.m2 * (w - 1.0);
        let denominator = (w - 1.0) * (w - 2.0) * (w - 3.0) * sd.powi(4);
        finite(numerator / denominator)
    }

    /// Standard error of kurtosis, defined for `W > 3`
    pub fn kurtosis_std_error(&self) -> Option<f64> {
        kurtosis_std_error(self.weight)
    }
}

/// `√(6W(W−1) / ((W−2)(W+1)(W+3)))`
pub fn skewness_std_error(w: f64) -> Option<f64> {
    if w <= 2.0 {
        return None;
    }
    finite((6.0 * w * (w - 1.0) / ((w - 2.0) * (w + 1.0) * (w + 3.0))).sqrt())
}

/// `√(4(W²−1)·SE_skew² / ((W−3)(W+5)))`
pub fn kurtosis_std_error(w: f64) -> Option<f64> {
    if w <= 3.0 {
        return None;
    }
    let se_skew = skewness_std_error(w)?;
    finite((4.0 * (w * w - 1.0) * se_skew * se_skew / ((w - 3.0) * (w + 5.0))).sqrt())
}
