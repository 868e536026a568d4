//! Frequency tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabstat_core::{
    case_weight, validate_weights, CaseKey, CasePrimitives, CaseStatus, CaseSummary, Result,
    Value, VariableDef,
};

/// Relative tolerance when comparing frequencies for mode ties
const TIE_TOLERANCE: f64 = 1e-9;

/// One valid value of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRow {
    pub value: Value,
    pub label: String,
    pub frequency: f64,
    /// Percentage of all cases, missing included
    #[serde(rename = "totalPercent")]
    pub percent: f64,
    pub valid_percent: f64,
    pub cumulative_percent: f64,
}

/// One user-missing code of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingRow {
    pub value: Value,
    pub label: String,
    pub frequency: f64,
    #[serde(rename = "totalPercent")]
    pub percent: f64,
}

/// Ordered frequency table of a single variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyTable {
    pub variable: String,
    pub label: String,
    pub rows: Vec<FrequencyRow>,
    pub missing_rows: Vec<MissingRow>,
    /// Weight of null, blank and uncoercible cases
    pub system_missing: f64,
    pub summary: CaseSummary,
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        100.0 * part / whole
    } else {
        0.0
    }
}

impl FrequencyTable {
    /// Group the valid weighted cases of `variable` by distinct value
    pub fn build<P: CasePrimitives + ?Sized>(
        primitives: &P,
        variable: &VariableDef,
        data: &[Value],
        weights: Option<&[f64]>,
    ) -> Result<Self> {
        validate_weights(data.len(), weights)?;
        let mut valid: BTreeMap<CaseKey, f64> = BTreeMap::new();
        let mut user_missing: BTreeMap<CaseKey, f64> = BTreeMap::new();
        let mut system_missing = 0.0;
        let mut summary = CaseSummary::default();

        for (index, raw) in data.iter().enumerate() {
            let Some(weight) = case_weight(weights, index) else {
                continue;
            };
            let status = primitives.classify(variable, raw);
            match status {
                CaseStatus::Valid => match primitives.category_key(variable, raw) {
                    Some(key) => *valid.entry(key).or_default() += weight,
                    None => {
                        system_missing += weight;
                        summary.record(CaseStatus::SystemMissing, weight);
                        continue;
                    }
                },
                CaseStatus::UserMissing => {
                    let key = primitives
                        .category_key(variable, raw)
                        .unwrap_or_else(|| CaseKey::Text(raw.normalized()));
                    *user_missing.entry(key).or_default() += weight;
                }
                CaseStatus::SystemMissing => system_missing += weight,
            }
            summary.record(status, weight);
        }

        let mut cumulative = 0.0;
        let rows = valid
            .into_iter()
            .map(|(key, frequency)| {
                let value = primitives.render_key(&key);
                let valid_percent = percent(frequency, summary.valid);
                cumulative += valid_percent;
                FrequencyRow {
                    label: primitives.label(variable, &value),
                    value,
                    frequency,
                    percent: percent(frequency, summary.total),
                    valid_percent,
                    cumulative_percent: cumulative,
                }
            })
            .collect();

        let missing_rows = user_missing
            .into_iter()
            .map(|(key, frequency)| {
                let value = primitives.render_key(&key);
                MissingRow {
                    label: primitives.label(variable, &value),
                    value,
                    frequency,
                    percent: percent(frequency, summary.total),
                }
            })
            .collect();

        Ok(Self {
            variable: variable.name.clone(),
            label: variable.label.clone(),
            rows,
            missing_rows,
            system_missing,
            summary,
        })
    }

    /// All values sharing the highest frequency, in ascending order
    pub fn modes(&self) -> Vec<Value> {
        let Some(top) = self.rows.iter().map(|r| r.frequency).reduce(f64::max) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|r| (top - r.frequency).abs() <= TIE_TOLERANCE * top.max(1.0))
            .map(|r| r.value.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
