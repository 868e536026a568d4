//! Extraction of weighted valid cases from raw observation vectors

use crate::primitives::{CasePrimitives, CaseStatus};
use crate::value::Value;
use crate::variable::VariableDef;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Weighted case counts: valid, missing and their total
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaseSummary {
    pub valid: f64,
    pub missing: f64,
    pub total: f64,
}

impl CaseSummary {
    pub fn record(&mut self, status: CaseStatus, weight: f64) {
        if status.is_valid() {
            self.valid += weight;
        } else {
            self.missing += weight;
        }
        self.total += weight;
    }
}

/// Check that an optional weight vector is index-aligned with the data
pub fn validate_weights(data_len: usize, weights: Option<&[f64]>) -> Result<()> {
    match weights {
        Some(w) if w.len() != data_len => Err(Error::size_mismatch(data_len, w.len(), "weight vector")),
        _ => Ok(()),
    }
}

/// Weight of case `index`, or `None` when the case must be excluded
///
/// Missing weight vectors default to 1. Weights that are not finite or not
/// strictly positive drop the case from every count.
pub fn case_weight(weights: Option<&[f64]>, index: usize) -> Option<f64> {
    match weights {
        None => Some(1.0),
        Some(w) => w.get(index).copied().filter(|x| x.is_finite() && *x > 0.0),
    }
}

/// Valid numeric cases of one variable together with their weights
#[derive(Debug, Clone, Default)]
pub struct WeightedCases {
    pub values: Vec<f64>,
    pub weights: Vec<f64>,
    /// Position of each valid case in the original observation vector
    pub case_indices: Vec<usize>,
    pub summary: CaseSummary,
}

impl WeightedCases {
    /// Collect the valid numeric cases of `variable`
    pub fn collect<P: CasePrimitives + ?Sized>(
        primitives: &P,
        variable: &VariableDef,
        data: &[Value],
        weights: Option<&[f64]>,
    ) -> Result<Self> {
        validate_weights(data.len(), weights)?;
        let mut cases = Self::default();
        for (index, raw) in data.iter().enumerate() {
            let Some(weight) = case_weight(weights, index) else {
                continue;
            };
            let status = match primitives.classify(variable, raw) {
                CaseStatus::Valid => match primitives.numeric_value(variable, raw) {
                    Some(x) => {
                        cases.values.push(x);
                        cases.weights.push(weight);
                        cases.case_indices.push(index);
                        CaseStatus::Valid
                    }
                    None => CaseStatus::SystemMissing,
                },
                other => other,
            };
            cases.summary.record(status, weight);
        }
        Ok(cases)
    }

    /// Sum of weights over valid cases
    pub fn total_weight(&self) -> f64 {
        self.summary.valid
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `(value, weight)` pairs in ascending value order; ties keep case order
    pub fn sorted_pairs(&self) -> Vec<(f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = self
            .values
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing::MissingSpec;
    use crate::primitives::StandardPrimitives;

    fn values(raw: &[Option<f64>]) -> Vec<Value> {
        raw.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_collect_unweighted() {
        let var = VariableDef::numeric("x").with_missing(MissingSpec::discrete([9.0]));
        let data = values(&[Some(1.0), None, Some(9.0), Some(3.0)]);
        let cases = WeightedCases::collect(&StandardPrimitives::new(), &var, &data, None).unwrap();
        assert_eq!(cases.values, vec![1.0, 3.0]);
        assert_eq!(cases.case_indices, vec![0, 3]);
        assert_eq!(
            cases.summary,
            CaseSummary { valid: 2.0, missing: 2.0, total: 4.0 }
        );
    }

    #[test]
    fn test_nonpositive_weights_drop_case() {
        let var = VariableDef::numeric("x");
        let data = values(&[Some(1.0), Some(2.0), Some(3.0), None]);
        let weights = [2.0, 0.0, f64::NAN, -1.0];
        let cases =
            WeightedCases::collect(&StandardPrimitives::new(), &var, &data, Some(&weights)).unwrap();
        assert_eq!(cases.values, vec![1.0]);
        assert_eq!(cases.total_weight(), 2.0);
        assert_eq!(cases.summary.total, 2.0);
    }

    #[test]
    fn test_weight_length_mismatch_is_error() {
        let var = VariableDef::numeric("x");
        let data = values(&[Some(1.0), Some(2.0)]);
        let result = WeightedCases::collect(&StandardPrimitives::new(), &var, &data, Some(&[1.0]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_sorted_pairs_is_stable() {
        let var = VariableDef::numeric("x");
        let data = values(&[Some(3.0), Some(1.0), Some(3.0)]);
        let weights = [1.0, 2.0, 3.0];
        let cases =
            WeightedCases::collect(&StandardPrimitives::new(), &var, &data, Some(&weights)).unwrap();
        assert_eq!(cases.sorted_pairs(), vec![(1.0, 2.0), (3.0, 1.0), (3.0, 3.0)]);
    }
}
