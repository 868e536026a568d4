//! The Examine procedure

use crate::extremes::{Extremes, DEFAULT_EXTREME_COUNT};
use crate::m_estimators::{MEstimatorConfig, MEstimates};
use crate::trimmed::{check_trim, trimmed_mean, DEFAULT_TRIM};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tabstat_core::{
    Calculator, CasePrimitives, CaseSummary, Error, Result, StandardPrimitives, VariableRequest,
    WeightedCases,
};
use tabstat_descriptive::{DescriptiveStats, WeightedMoments};
use tabstat_quantile::{tukey_hinges, CumulativeSample, Hinges, PercentileMethod, PercentileValue};
use tracing::{debug, instrument};

/// Percentiles reported by Examine
pub const EXAMINE_PERCENTILES: [f64; 7] = [5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0];

/// Options for the Examine procedure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamineOptions {
    pub percentile_method: PercentileMethod,
    /// Coverage of the confidence interval for the mean, in (0, 1)
    pub confidence_level: f64,
    /// Weight share trimmed from each tail for the trimmed mean
    pub trim_proportion: f64,
    pub m_estimators: MEstimatorConfig,
    /// Number of cases listed at each end
    pub extreme_count: usize,
}

impl Default for ExamineOptions {
    fn default() -> Self {
        Self {
            percentile_method: PercentileMethod::Haverage,
            confidence_level: 0.95,
            trim_proportion: DEFAULT_TRIM,
            m_estimators: MEstimatorConfig::default(),
            extreme_count: DEFAULT_EXTREME_COUNT,
        }
    }
}

impl ExamineOptions {
    pub fn with_percentile_method(mut self, method: PercentileMethod) -> Self {
        self.percentile_method = method;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_trim_proportion(mut self, proportion: f64) -> Self {
        self.trim_proportion = proportion;
        self
    }

    pub fn with_m_estimators(mut self, config: MEstimatorConfig) -> Self {
        self.m_estimators = config;
        self
    }

    pub fn with_extreme_count(mut self, count: usize) -> Self {
        self.extreme_count = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "Confidence level {} must be in (0, 1)",
                self.confidence_level
            )));
        }
        check_trim(self.trim_proportion)?;
        if self.m_estimators.enabled {
            self.m_estimators.validate()?;
        }
        Ok(())
    }
}

pub type ExamineRequest = VariableRequest<ExamineOptions>;

/// Two-sided confidence interval for the mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeanInterval {
    pub lower: f64,
    pub upper: f64,
    pub confidence_level: f64,
}

impl MeanInterval {
    /// Student t interval with `W − 1` degrees of freedom; needs `W > 1`
    pub fn compute(moments: &WeightedMoments, confidence_level: f64) -> Result<Option<Self>> {
        let Some(se) = moments.std_error_mean() else {
            return Ok(None);
        };
        let df = moments.weight - 1.0;
        let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
            Error::Computation(format!("Failed to create t-distribution: {}", e))
        })?;
        let critical = t_dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0);
        let margin = critical * se;
        if !margin.is_finite() {
            return Ok(None);
        }
        Ok(Some(Self {
            lower: moments.mean - margin,
            upper: moments.mean + margin,
            confidence_level,
        }))
    }
}

/// Descriptives panel of the Examine procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamineStats {
    #[serde(flatten)]
    pub descriptive: DescriptiveStats,
    pub mean_interval: Option<MeanInterval>,
    pub trimmed_mean: Option<f64>,
    pub median: Option<f64>,
    /// P75 − P25 under the selected percentile method
    pub interquartile_range: Option<f64>,
}

/// Result of the Examine procedure for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamineResult {
    pub variable: String,
    pub stats: ExamineStats,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub m_estimators: Option<MEstimates>,
    pub percentiles: Vec<PercentileValue>,
    pub hinges: Option<Hinges>,
    pub extremes: Extremes,
    pub summary: CaseSummary,
}

/// Exploratory statistics calculator
#[derive(Debug, Clone, Default)]
pub struct ExamineCalculator<P: CasePrimitives = StandardPrimitives> {
    primitives: P,
}

impl ExamineCalculator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CasePrimitives> ExamineCalculator<P> {
    pub fn with_primitives(primitives: P) -> Self {
        Self { primitives }
    }
}

fn value_at(percentiles: &[PercentileValue], p: f64) -> Option<f64> {
    percentiles
        .iter()
        .find(|v| v.percentile == p)
        .and_then(|v| v.value)
}

impl<P: CasePrimitives> Calculator for ExamineCalculator<P> {
    type Request = ExamineRequest;
    type Output = ExamineResult;

    fn name(&self) -> &str {
        "Examine"
    }

    #[instrument(skip_all, fields(variable = %request.variable.name))]
    fn compute(&self, request: &ExamineRequest) -> Result<ExamineResult> {
        request.variable.validate()?;
        let options = &request.options;
        options.validate()?;

        let cases = WeightedCases::collect(
            &self.primitives,
            &request.variable,
            &request.data,
            request.weights(),
        )?;
        let moments = WeightedMoments::compute(&cases.values, &cases.weights);
        let pairs = cases.sorted_pairs();
        let sample = CumulativeSample::from_sorted(&pairs);

        let percentiles = sample.percentile_table(&EXAMINE_PERCENTILES, options.percentile_method);
        let interquartile_range = value_at(&percentiles, 75.0)
            .zip(value_at(&percentiles, 25.0))
            .map(|(q3, q1)| q3 - q1);
        let mean_interval = match &moments {
            Some(m) => MeanInterval::compute(m, options.confidence_level)?,
            None => None,
        };

        let m_estimators = options
            .m_estimators
            .enabled
            .then(|| MEstimates::compute(&cases.values, &cases.weights, &options.m_estimators));
        if let Some(m) = &m_estimators {
            for (name, estimate) in m.iter() {
                debug!(
                    estimator = name,
                    iterations = estimate.iterations,
                    converged = estimate.converged,
                    "M-estimation finished"
                );
            }
        }

        let stats = ExamineStats {
            descriptive: DescriptiveStats::from_moments(moments.as_ref(), &cases.summary),
            mean_interval,
            trimmed_mean: trimmed_mean(&pairs, options.trim_proportion)?,
            median: sample.percentile(0.5, options.percentile_method),
            interquartile_range,
        };
        debug!(valid = cases.summary.valid, missing = cases.summary.missing, "examined variable");

        Ok(ExamineResult {
            variable: request.variable.name.clone(),
            stats,
            m_estimators,
            percentiles,
            hinges: tukey_hinges(&sample),
            extremes: Extremes::from_cases(&cases, options.extreme_count),
            summary: cases.summary,
        })
    }
}
