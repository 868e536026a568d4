//! The Descriptives procedure

use crate::moments::WeightedMoments;
use serde::{Deserialize, Serialize};
use tabstat_core::{
    Calculator, CasePrimitives, CaseSummary, Result, StandardPrimitives, VariableRequest,
    WeightedCases,
};
use tracing::{debug, instrument};

/// Options for the Descriptives procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptiveOptions {
    /// Return per-case z-scores aligned with the input data
    pub save_standardized: bool,
}

impl DescriptiveOptions {
    pub fn with_standardized(mut self) -> Self {
        self.save_standardized = true;
        self
    }
}

pub type DescriptiveRequest = VariableRequest<DescriptiveOptions>;

/// Descriptive statistics of one variable; `None` means undefined for this N
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    /// Weighted valid N
    pub n: f64,
    pub missing: f64,
    pub mean: Option<f64>,
    pub std_error_mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub variance: Option<f64>,
    pub skewness: Option<f64>,
    pub skewness_std_error: Option<f64>,
    pub kurtosis: Option<f64>,
    pub kurtosis_std_error: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub range: Option<f64>,
    pub sum: Option<f64>,
}

impl DescriptiveStats {
    /// Assemble the statistics block from accumulated moments
    pub fn from_moments(moments: Option<&WeightedMoments>, summary: &CaseSummary) -> Self {
        let Some(m) = moments else {
            return Self {
                n: summary.valid,
                missing: summary.missing,
                ..Default::default()
            };
        };
        Self {
            n: summary.valid,
            missing: summary.missing,
            mean: Some(m.mean),
            std_error_mean: m.std_error_mean(),
            std_dev: m.std_dev(),
            variance: m.variance(),
            skewness: m.skewness(),
            skewness_std_error: m.skewness_std_error(),
            kurtosis: m.kurtosis(),
            kurtosis_std_error: m.kurtosis_std_error(),
            minimum: Some(m.min),
            maximum: Some(m.max),
            range: Some(m.range()),
            sum: Some(m.sum),
        }
    }
}

/// Result of the Descriptives procedure for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveResult {
    pub variable: String,
    pub stats: DescriptiveStats,
    pub summary: CaseSummary,
    /// Z-scores aligned with the input data, when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub standardized: Option<Vec<Option<f64>>>,
}

/// Weighted descriptive statistics calculator
#[derive(Debug, Clone, Default)]
pub struct DescriptiveCalculator<P: CasePrimitives = StandardPrimitives> {
    primitives: P,
}

impl DescriptiveCalculator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CasePrimitives> DescriptiveCalculator<P> {
    pub fn with_primitives(primitives: P) -> Self {
        Self { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Valid cases and their moments, shared with the other procedures
    pub fn moments(
        &self,
        request: &DescriptiveRequest,
    ) -> Result<(WeightedCases, Option<WeightedMoments>)> {
        let cases = WeightedCases::collect(
            &self.primitives,
            &request.variable,
            &request.data,
            request.weights(),
        )?;
        let moments = WeightedMoments::compute(&cases.values, &cases.weights);
        Ok((cases, moments))
    }
}

fn standardize(cases: &WeightedCases, len: usize, moments: &WeightedMoments) -> Vec<Option<f64>> {
    let mut z = vec![None; len];
    if let Some(sd) = moments.std_dev().filter(|sd| *sd > 0.0) {
        for (&index, &x) in cases.case_indices.iter().zip(&cases.values) {
            z[index] = Some((x - moments.mean) / sd);
        }
    }
    z
}

impl<P: CasePrimitives> Calculator for DescriptiveCalculator<P> {
    type Request = DescriptiveRequest;
    type Output = DescriptiveResult;

    fn name(&self) -> &str {
        "Descriptives"
    }

    #[instrument(skip_all, fields(variable = %request.variable.name))]
    fn compute(&self, request: &DescriptiveRequest) -> Result<DescriptiveResult> {
        request.variable.validate()?;
        let (cases, moments) = self.moments(request)?;
        debug!(
            valid = cases.summary.valid,
            missing = cases.summary.missing,
            "collected cases"
        );

        let standardized = match (&moments, request.options.save_standardized) {
            (Some(m), true) => Some(standardize(&cases, request.data.len(), m)),
            (None, true) => Some(vec![None; request.data.len()]),
            (_, false) => None,
        };

        Ok(DescriptiveResult {
            variable: request.variable.name.clone(),
            stats: DescriptiveStats::from_moments(moments.as_ref(), &cases.summary),
            summary: cases.summary,
            standardized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabstat_core::{MissingSpec, Value, VariableDef};

    fn request(data: &[f64]) -> DescriptiveRequest {
        DescriptiveRequest::new(
            VariableDef::numeric("x"),
            data.iter().map(|&x| Value::from(x)).collect(),
        )
    }

    #[test]
    fn test_basic_statistics() {
        let result = DescriptiveCalculator::new()
            .compute(&request(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .unwrap();
        let s = result.stats;
        assert_relative_eq!(s.n, 5.0);
        assert_relative_eq!(s.mean.unwrap(), 3.0);
        assert_relative_eq!(s.variance.unwrap(), 2.5);
        assert_relative_eq!(s.std_error_mean.unwrap(), (2.5f64 / 5.0).sqrt());
        assert_relative_eq!(s.minimum.unwrap(), 1.0);
        assert_relative_eq!(s.maximum.unwrap(), 5.0);
        assert_relative_eq!(s.range.unwrap(), 4.0);
        assert_relative_eq!(s.sum.unwrap(), 15.0);
    }

    #[test]
    fn test_weighted_statistics() {
        let req = request(&[1.0, 2.0, 3.0, 4.0, 5.0]).with_weights(vec![2.0, 1.0, 1.0, 1.0, 1.0]);
        let result = DescriptiveCalculator::new().compute(&req).unwrap();
        assert_relative_eq!(result.stats.n, 6.0);
        assert_relative_eq!(result.stats.mean.unwrap(), 16.0 / 6.0);
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let var = VariableDef::numeric("x").with_missing(MissingSpec::range(90.0, 99.0));
        let data = vec![
            Value::from(1.0),
            Value::from(99.0),
            Value::Null,
            Value::from("3"),
            Value::from("oops"),
        ];
        let result = DescriptiveCalculator::new()
            .compute(&DescriptiveRequest::new(var, data))
            .unwrap();
        assert_relative_eq!(result.stats.n, 2.0);
        assert_relative_eq!(result.stats.missing, 3.0);
        assert_relative_eq!(result.summary.total, 5.0);
        assert_relative_eq!(result.stats.mean.unwrap(), 2.0);
    }

    #[test]
    fn test_no_valid_cases_yields_nulls() {
        let result = DescriptiveCalculator::new()
            .compute(&DescriptiveRequest::new(
                VariableDef::numeric("x"),
                vec![Value::Null, Value::from("")],
            ))
            .unwrap();
        assert_eq!(result.stats.mean, None);
        assert_eq!(result.stats.minimum, None);
        assert_relative_eq!(result.stats.missing, 2.0);
    }

    #[test]
    fn test_standardized_values() {
        let mut req = request(&[1.0, 2.0, 3.0]);
        req.data.push(Value::Null);
        let req = req.with_options(DescriptiveOptions::default().with_standardized());
        let result = DescriptiveCalculator::new().compute(&req).unwrap();
        let z = result.standardized.unwrap();
        assert_eq!(z.len(), 4);
        assert_relative_eq!(z[0].unwrap(), -1.0);
        assert_relative_eq!(z[1].unwrap(), 0.0);
        assert_relative_eq!(z[2].unwrap(), 1.0);
        assert_eq!(z[3], None);
    }

    #[test]
    fn test_structural_errors() {
        let calc = DescriptiveCalculator::new();
        let unnamed = DescriptiveRequest::new(VariableDef::default(), vec![Value::from(1.0)]);
        assert!(calc.compute(&unnamed).is_err());

        let mismatched = request(&[1.0, 2.0]).with_weights(vec![1.0]);
        assert!(calc.compute(&mismatched).is_err());
    }

    #[test]
    fn test_serializes_nulls() {
        let result = DescriptiveCalculator::new().compute(&request(&[2.0])).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stats"]["mean"], serde_json::json!(2.0));
        assert!(json["stats"]["variance"].is_null());
        assert!(json["stats"]["skewness"].is_null());
        assert!(json.get("standardized").is_none());
    }
}
