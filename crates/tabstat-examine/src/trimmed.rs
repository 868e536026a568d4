//! Weighted trimmed mean

use tabstat_core::{Error, Result};

/// Default proportion of weight removed from each tail
pub const DEFAULT_TRIM: f64 = 0.05;

/// Check a per-tail trim proportion
pub fn check_trim(proportion: f64) -> Result<()> {
    if !(0.0..0.5).contains(&proportion) {
        return Err(Error::InvalidParameter(format!(
            "Trim proportion {proportion} must be in [0, 0.5)"
        )));
    }
    Ok(())
}

/// Mean of the central `1 − 2α` share of the weighted distribution
///
/// Each case occupies the stretch `[Cᵢ₋₁, Cᵢ]` of the cumulative weight axis
/// `[0, W]`. Only the part of that stretch inside `[αW, (1 − α)W]` counts, so
/// a case straddling a cut point contributes fractionally. `pairs` must be
/// sorted by value.
pub fn trimmed_mean(pairs: &[(f64, f64)], proportion: f64) -> Result<Option<f64>> {
    check_trim(proportion)?;
    let total: f64 = pairs.iter().map(|&(_, w)| w).sum();
    if pairs.is_empty() || total <= 0.0 {
        return Ok(None);
    }

    let lower = proportion * total;
    let upper = total - lower;
    let mut start = 0.0;
    let mut sum = 0.0;
    let mut kept = 0.0;
    for &(x, w) in pairs {
        let end = start + w;
        let overlap = end.min(upper) - start.max(lower);
        if overlap > 0.0 {
            sum += overlap * x;
            kept += overlap;
        }
        start = end;
    }
    Ok((kept > 0.0).then(|| sum / kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit(values: &[f64]) -> Vec<(f64, f64)> {
        values.iter().map(|&x| (x, 1.0)).collect()
    }

    #[test]
    fn test_symmetric_equals_mean() {
        let m = trimmed_mean(&unit(&[1.0, 2.0, 3.0, 4.0, 5.0]), DEFAULT_TRIM).unwrap();
        assert_relative_eq!(m.unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_outlier_is_damped() {
        let mut values: Vec<f64> = (1..=19).map(f64::from).collect();
        values.push(1000.0);
        let pairs = unit(&values);
        let trimmed = trimmed_mean(&pairs, DEFAULT_TRIM).unwrap().unwrap();
        // One full case from each tail: mean of 2..=19
        assert_relative_eq!(trimmed, 10.5, epsilon = 1e-12);
        let untrimmed = trimmed_mean(&pairs, 0.0).unwrap().unwrap();
        assert!(untrimmed > 50.0);
    }

    #[test]
    fn test_weights_replicate_cases() {
        let weighted = trimmed_mean(&[(1.0, 2.0), (2.0, 1.0), (6.0, 1.0)], 0.25).unwrap();
        let replicated = trimmed_mean(&unit(&[1.0, 1.0, 2.0, 6.0]), 0.25).unwrap();
        assert_relative_eq!(weighted.unwrap(), replicated.unwrap(), epsilon = 1e-12);
        assert_relative_eq!(weighted.unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_and_empty() {
        assert!(trimmed_mean(&unit(&[1.0]), 0.5).is_err());
        assert!(trimmed_mean(&unit(&[1.0]), -0.1).is_err());
        assert_eq!(trimmed_mean(&[], DEFAULT_TRIM).unwrap(), None);
    }
}
