//! Variable definitions and value labels

use crate::missing::MissingSpec;
use crate::value::{format_number, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Measurement level of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementLevel {
    Nominal,
    Ordinal,
    Scale,
    #[default]
    Unknown,
}

/// Storage type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableType {
    #[default]
    Numeric,
    String,
    Date,
}

/// A label attached to one value of a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub value: Value,
    pub label: String,
}

/// Definition of a variable, immutable for the duration of one computation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariableDef {
    pub name: String,
    pub label: String,
    pub measurement_level: MeasurementLevel,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub decimals: Option<u32>,
    #[serde(alias = "missingSpec")]
    pub missing: MissingSpec,
    pub value_labels: Vec<ValueLabel>,
}

impl VariableDef {
    /// Numeric variable with no labels or missing codes
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VariableType::Numeric,
            measurement_level: MeasurementLevel::Scale,
            ..Default::default()
        }
    }

    /// String variable with no labels or missing codes
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VariableType::String,
            measurement_level: MeasurementLevel::Nominal,
            ..Default::default()
        }
    }

    /// Date variable with no labels or missing codes
    pub fn date(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VariableType::Date,
            measurement_level: MeasurementLevel::Scale,
            ..Default::default()
        }
    }

    pub fn with_missing(mut self, missing: MissingSpec) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_value_label(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.value_labels.push(ValueLabel {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.var_type == VariableType::Numeric
    }

    pub fn is_date(&self) -> bool {
        self.var_type == VariableType::Date
    }

    /// Reject definitions a calculator cannot identify
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::missing_field("variable.name"));
        }
        Ok(())
    }
}

/// Label for a raw value: the configured value label, else the value itself
///
/// Numeric values without a label are rounded to the variable's decimals.
pub fn map_value_label(variable: &VariableDef, raw: &Value) -> String {
    let numeric = variable.is_numeric();
    if let Some(found) = variable
        .value_labels
        .iter()
        .find(|vl| raw.matches(&vl.value, numeric))
    {
        return found.label.clone();
    }
    match (numeric, raw.to_number(), variable.decimals) {
        (true, Some(x), Some(decimals)) => format_number(round_to(x, decimals)),
        _ => raw.normalized(),
    }
}

/// Round half away from zero to the given number of decimals
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(15) as i32);
    (value * factor).round() / factor
}
