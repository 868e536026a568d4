//! Extreme values

use serde::{Deserialize, Serialize};
use tabstat_core::WeightedCases;

/// Default number of cases listed at each end
pub const DEFAULT_EXTREME_COUNT: usize = 5;

/// A valid case and its position in the input data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtremeValue {
    pub case_index: usize,
    pub value: f64,
}

/// Highest values in descending order and lowest values in ascending order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extremes {
    pub highest: Vec<ExtremeValue>,
    pub lowest: Vec<ExtremeValue>,
}

impl Extremes {
    /// The `count` highest and lowest valid cases; ties keep input order
    pub fn from_cases(cases: &WeightedCases, count: usize) -> Self {
        let mut ranked: Vec<ExtremeValue> = cases
            .case_indices
            .iter()
            .zip(&cases.values)
            .map(|(&case_index, &value)| ExtremeValue { case_index, value })
            .collect();
        ranked.sort_by(|a, b| a.value.total_cmp(&b.value).then(a.case_index.cmp(&b.case_index)));
        let lowest = ranked.iter().take(count).copied().collect();

        ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.case_index.cmp(&b.case_index)));
        let highest = ranked.iter().take(count).copied().collect();
        Self { highest, lowest }
    }
}
