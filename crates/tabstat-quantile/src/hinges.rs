//! Tukey's hinges

use crate::weighted::CumulativeSample;
use serde::{Deserialize, Serialize};

/// Lower hinge, median and upper hinge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hinges {
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
}

impl Hinges {
    /// Spread between the hinges
    pub fn h_spread(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Tukey's hinges of a weighted sample
///
/// The median sits at depth `(W + 1) / 2`; each hinge sits at depth
/// `(⌊median depth⌋ + 1) / 2` counted in from its end.
pub fn tukey_hinges(sample: &CumulativeSample) -> Option<Hinges> {
    if sample.is_empty() {
        return None;
    }
    let w = sample.total();
    let median_depth = (w + 1.0) / 2.0;
    let hinge_depth = (median_depth.floor() + 1.0) / 2.0;
    Some(Hinges {
        lower: sample.interpolate(hinge_depth)?,
        median: sample.interpolate(median_depth)?,
        upper: sample.interpolate(w + 1.0 - hinge_depth)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hinges(values: &[f64]) -> Hinges {
        tukey_hinges(&CumulativeSample::new(values, &vec![1.0; values.len()])).unwrap()
    }

    #[test]
    fn test_odd_sample() {
        let h = hinges(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(h.lower, 2.0);
        assert_relative_eq!(h.median, 3.0);
        assert_relative_eq!(h.upper, 4.0);
        assert_relative_eq!(h.h_spread(), 2.0);
    }

    #[test]
    fn test_even_sample() {
        let h = hinges(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_relative_eq!(h.lower, 2.0);
        assert_relative_eq!(h.median, 3.5);
        assert_relative_eq!(h.upper, 5.0);
    }

    #[test]
    fn test_hinge_interpolation() {
        // n = 7: median depth 4, hinge depth 2.5
        let h = hinges(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_relative_eq!(h.lower, 2.5);
        assert_relative_eq!(h.upper, 5.5);
    }

    #[test]
    fn test_empty() {
        assert!(tukey_hinges(&CumulativeSample::new(&[], &[])).is_none());
    }
}
