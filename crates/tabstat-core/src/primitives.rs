//! Case-level primitives injected into every calculator
//!
//! Calculators are parameterized by a [`CasePrimitives`] implementation rather
//! than reaching for free functions, so missing-value policy, label mapping and
//! date handling can be swapped without touching the statistics.

use crate::date::{DateCodec, PatternDateCodec};
use crate::missing::is_missing;
use crate::value::Value;
use crate::variable::{map_value_label, VariableDef, VariableType};
use ordered_float::OrderedFloat;

/// Classification of one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    /// Usable in statistics
    Valid,
    /// Matches the variable's user-defined missing specification
    UserMissing,
    /// Null, blank, or not coercible to the variable's type
    SystemMissing,
}

impl CaseStatus {
    pub fn is_valid(self) -> bool {
        self == CaseStatus::Valid
    }
}

/// Totally ordered key used to group categories
///
/// A single variable only ever produces one kind of key, so the cross-kind
/// ordering of the derived `Ord` never matters in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaseKey {
    Number(OrderedFloat<f64>),
    Date(i64),
    Text(String),
}

impl CaseKey {
    /// Numeric position of the key, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CaseKey::Number(x) => Some(x.into_inner()),
            CaseKey::Date(d) => Some(*d as f64),
            CaseKey::Text(_) => None,
        }
    }
}

/// Primitive operations every calculator depends on
pub trait CasePrimitives: Send + Sync {
    /// Classify a raw value for the given variable
    fn classify(&self, variable: &VariableDef, value: &Value) -> CaseStatus;

    /// Numeric value used in arithmetic; dates map to their day ordinal
    fn numeric_value(&self, variable: &VariableDef, value: &Value) -> Option<f64>;

    /// Grouping key for frequency and contingency tables
    fn category_key(&self, variable: &VariableDef, value: &Value) -> Option<CaseKey>;

    /// Value shown for a category key; dates are re-encoded
    fn render_key(&self, key: &CaseKey) -> Value;

    /// Display label for a raw value
    fn label(&self, variable: &VariableDef, value: &Value) -> String {
        map_value_label(variable, value)
    }
}

/// Standard primitives: the variable's own missing specification plus a date codec
#[derive(Debug, Clone, Default)]
pub struct StandardPrimitives<D: DateCodec = PatternDateCodec> {
    codec: D,
}

impl StandardPrimitives {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DateCodec> StandardPrimitives<D> {
    /// Use a custom date codec
    pub fn with_codec(codec: D) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &D {
        &self.codec
    }
}

impl<D: DateCodec> CasePrimitives for StandardPrimitives<D> {
    fn classify(&self, variable: &VariableDef, value: &Value) -> CaseStatus {
        if value.is_blank() {
            return CaseStatus::SystemMissing;
        }
        if is_missing(value, &variable.missing, variable.is_numeric()) {
            return CaseStatus::UserMissing;
        }
        let coercible = match variable.var_type {
            VariableType::Numeric => value.to_number().is_some(),
            VariableType::Date => self.codec.decode(&value.normalized()).is_some(),
            VariableType::String => true,
        };
        if coercible {
            CaseStatus::Valid
        } else {
            CaseStatus::SystemMissing
        }
    }

    fn numeric_value(&self, variable: &VariableDef, value: &Value) -> Option<f64> {
        match variable.var_type {
            VariableType::Date => self.codec.decode(&value.normalized()).map(|d| d as f64),
            VariableType::Numeric | VariableType::String => value.to_number(),
        }
    }

    fn category_key(&self, variable: &VariableDef, value: &Value) -> Option<CaseKey> {
        match variable.var_type {
            VariableType::Numeric => value.to_number().map(|x| CaseKey::Number(OrderedFloat(x))),
            VariableType::Date => self.codec.decode(&value.normalized()).map(CaseKey::Date),
            VariableType::String => (!value.is_blank()).then(|| CaseKey::Text(value.normalized())),
        }
    }

    fn render_key(&self, key: &CaseKey) -> Value {
        match key {
            CaseKey::Number(x) => Value::Number(x.into_inner()),
            CaseKey::Date(d) => Value::Text(self.codec.encode(*d).unwrap_or_else(|| d.to_string())),
            CaseKey::Text(s) => Value::Text(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing::MissingSpec;

    #[test]
    fn test_classify_numeric() {
        let p = StandardPrimitives::new();
        let var = VariableDef::numeric("x").with_missing(MissingSpec::discrete([-9.0]));
        assert_eq!(p.classify(&var, &Value::from(1.0)), CaseStatus::Valid);
        assert_eq!(p.classify(&var, &Value::from("2,5")), CaseStatus::Valid);
        assert_eq!(p.classify(&var, &Value::from(-9.0)), CaseStatus::UserMissing);
        assert_eq!(p.classify(&var, &Value::Null), CaseStatus::SystemMissing);
        assert_eq!(p.classify(&var, &Value::from("abc")), CaseStatus::SystemMissing);
        assert_eq!(
            p.classify(&var, &Value::Number(f64::NAN)),
            CaseStatus::SystemMissing
        );
    }

    #[test]
    fn test_classify_date() {
        let p = StandardPrimitives::new();
        let var = VariableDef::date("d");
        assert_eq!(p.classify(&var, &Value::from("28-02-2021")), CaseStatus::Valid);
        assert_eq!(
            p.classify(&var, &Value::from("30-02-2021")),
            CaseStatus::SystemMissing
        );
    }

    #[test]
    fn test_date_keys_sort_chronologically() {
        let p = StandardPrimitives::new();
        let var = VariableDef::date("d");
        let a = p.category_key(&var, &Value::from("01-02-2020")).unwrap();
        let b = p.category_key(&var, &Value::from("15-01-2021")).unwrap();
        assert!(a < b);
        assert_eq!(p.render_key(&a), Value::from("01-02-2020"));
    }

    #[test]
    fn test_numeric_keys_sort_numerically() {
        let p = StandardPrimitives::new();
        let var = VariableDef::numeric("x");
        let ten = p.category_key(&var, &Value::from("10")).unwrap();
        let nine = p.category_key(&var, &Value::from(9.0)).unwrap();
        assert!(nine < ten);
    }
}
