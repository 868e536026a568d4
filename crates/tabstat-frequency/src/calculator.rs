//! The Frequencies procedure

use crate::table::FrequencyTable;
use serde::{Deserialize, Serialize};
use tabstat_core::{
    Calculator, CasePrimitives, CaseSummary, Error, Result, StandardPrimitives, Value,
    VariableRequest, WeightedCases,
};
use tabstat_descriptive::{DescriptiveStats, WeightedMoments};
use tabstat_quantile::{check_percentile, CumulativeSample, PercentileMethod, PercentileValue};
use tracing::{debug, instrument};

/// Options for the Frequencies procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrequencyOptions {
    /// Include the frequency table in the result
    pub display_frequency: bool,
    /// Report the 25th, 50th and 75th percentiles
    pub quartiles: bool,
    /// Report cut points dividing the data into this many equal groups
    pub cut_points: Option<usize>,
    /// Additional percentiles on the 0-100 scale
    pub percentiles: Vec<f64>,
    pub percentile_method: PercentileMethod,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            display_frequency: true,
            quartiles: false,
            cut_points: None,
            percentiles: Vec::new(),
            percentile_method: PercentileMethod::Haverage,
        }
    }
}

impl FrequencyOptions {
    pub fn with_quartiles(mut self) -> Self {
        self.quartiles = true;
        self
    }

    pub fn with_cut_points(mut self, groups: usize) -> Self {
        self.cut_points = Some(groups);
        self
    }

    pub fn with_percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.percentiles = percentiles;
        self
    }

    pub fn without_table(mut self) -> Self {
        self.display_frequency = false;
        self
    }

    /// Requested percentiles in ascending order without duplicates
    pub fn requested_percentiles(&self) -> Result<Vec<f64>> {
        let mut requested = Vec::new();
        if self.quartiles {
            requested.extend([25.0, 50.0, 75.0]);
        }
        if let Some(groups) = self.cut_points {
            if groups < 2 {
                return Err(Error::InvalidParameter(format!(
                    "Cut points need at least 2 groups, got {groups}"
                )));
            }
            requested.extend((1..groups).map(|i| 100.0 * i as f64 / groups as f64));
        }
        for &p in &self.percentiles {
            check_percentile(p)?;
            requested.push(p);
        }
        requested.sort_by(f64::total_cmp);
        requested.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        Ok(requested)
    }
}

pub type FrequencyRequest = VariableRequest<FrequencyOptions>;

/// Statistics panel of the Frequencies procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyStatistics {
    #[serde(flatten)]
    pub descriptive: DescriptiveStats,
    pub median: Option<f64>,
    /// Every value sharing the highest frequency
    pub modes: Vec<Value>,
    pub percentiles: Vec<PercentileValue>,
}

/// Result of the Frequencies procedure for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyResult {
    pub variable: String,
    pub stats: FrequencyStatistics,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frequency_table: Option<FrequencyTable>,
    pub summary: CaseSummary,
}

/// Statistics of one variable within a batched response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStatistics {
    pub variable: String,
    pub stats: FrequencyStatistics,
    pub summary: CaseSummary,
}

/// Batched response: all statistics panels, then all tables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyBatch {
    pub statistics: Vec<VariableStatistics>,
    pub frequency_tables: Vec<FrequencyTable>,
}

impl FrequencyBatch {
    pub fn from_results(results: Vec<FrequencyResult>) -> Self {
        let mut batch = Self::default();
        for result in results {
            batch.statistics.push(VariableStatistics {
                variable: result.variable,
                stats: result.stats,
                summary: result.summary,
            });
            if let Some(table) = result.frequency_table {
                batch.frequency_tables.push(table);
            }
        }
        batch
    }
}

/// Weighted frequency table calculator
#[derive(Debug, Clone, Default)]
pub struct FrequencyCalculator<P: CasePrimitives = StandardPrimitives> {
    primitives: P,
}

impl FrequencyCalculator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CasePrimitives> FrequencyCalculator<P> {
    pub fn with_primitives(primitives: P) -> Self {
        Self { primitives }
    }

    /// Scale panel of a numeric variable: moments, median and percentiles
    fn scale_panel(
        &self,
        request: &FrequencyRequest,
        requested: &[f64],
        stats: &mut FrequencyStatistics,
    ) -> Result<()> {
        let cases = WeightedCases::collect(
            &self.primitives,
            &request.variable,
            &request.data,
            request.weights(),
        )?;
        let moments = WeightedMoments::compute(&cases.values, &cases.weights);
        stats.descriptive = DescriptiveStats::from_moments(moments.as_ref(), &cases.summary);

        let method = request.options.percentile_method;
        let sample = CumulativeSample::from_sorted(&cases.sorted_pairs());
        stats.median = sample.percentile(0.5, method);
        stats.percentiles = sample.percentile_table(requested, method);
        Ok(())
    }
}

impl<P: CasePrimitives> Calculator for FrequencyCalculator<P> {
    type Request = FrequencyRequest;
    type Output = FrequencyResult;

    fn name(&self) -> &str {
        "Frequencies"
    }

    #[instrument(skip_all, fields(variable = %request.variable.name))]
    fn compute(&self, request: &FrequencyRequest) -> Result<FrequencyResult> {
        request.variable.validate()?;
        let requested = request.options.requested_percentiles()?;
        let table = FrequencyTable::build(
            &self.primitives,
            &request.variable,
            &request.data,
            request.weights(),
        )?;
        debug!(categories = table.rows.len(), valid = table.summary.valid, "built frequency table");

        let mut stats = FrequencyStatistics {
            descriptive: DescriptiveStats {
                n: table.summary.valid,
                missing: table.summary.missing,
                ..Default::default()
            },
            median: None,
            modes: table.modes(),
            percentiles: requested
                .iter()
                .map(|&p| PercentileValue { percentile: p, value: None })
                .collect(),
        };
        if request.variable.is_numeric() {
            self.scale_panel(request, &requested, &mut stats)?;
        }

        let summary = table.summary;
        Ok(FrequencyResult {
            variable: request.variable.name.clone(),
            stats,
            frequency_table: request.options.display_frequency.then_some(table),
            summary,
        })
    }
}
