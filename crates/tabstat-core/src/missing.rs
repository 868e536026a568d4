//! User-defined missing-value specifications

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Missing-value specification attached to a variable
///
/// Null and blank cells are always missing regardless of the specification.
///
/// Serialized with a `kind` tag. Deserialization also accepts the untagged
/// object shapes, inferring the variant from the keys present:
/// `{values: [..]}` (or `discrete`), `{min, max}` (or `range: {min, max}`),
/// and a range together with a single `value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", try_from = "MissingSpecRepr")]
pub enum MissingSpec {
    /// Only system-missing (null/blank) values are missing
    #[default]
    None,
    /// A list of discrete missing codes, matched by normalized equality
    Discrete { values: Vec<Value> },
    /// An inclusive numeric range (numeric variables only)
    Range { min: f64, max: f64 },
    /// An inclusive numeric range plus one discrete code
    RangeAndValue { min: f64, max: f64, value: Value },
}

impl MissingSpec {
    /// Discrete missing codes
    pub fn discrete<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Discrete {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Inclusive range of missing codes
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max }
    }

    /// True when the value is a user-defined missing code
    ///
    /// Does not consider system-missing; see [`is_missing`].
    pub fn is_user_missing(&self, value: &Value, numeric: bool) -> bool {
        match self {
            MissingSpec::None => false,
            MissingSpec::Discrete { values } => values.iter().any(|m| value.matches(m, numeric)),
            MissingSpec::Range { min, max } => numeric && in_range(value, *min, *max),
            MissingSpec::RangeAndValue { min, max, value: code } => {
                (numeric && in_range(value, *min, *max)) || value.matches(code, numeric)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MissingSpecRepr {
    Tagged(TaggedSpec),
    Keyed(KeyedSpec),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum TaggedSpec {
    None,
    Discrete { values: Vec<Value> },
    Range { min: f64, max: f64 },
    RangeAndValue { min: f64, max: f64, value: Value },
}

#[derive(Deserialize)]
struct Bounds {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyedSpec {
    #[serde(alias = "discrete")]
    values: Option<Vec<Value>>,
    min: Option<f64>,
    max: Option<f64>,
    range: Option<Bounds>,
    value: Option<Value>,
}

impl TryFrom<MissingSpecRepr> for MissingSpec {
    type Error = String;

    fn try_from(repr: MissingSpecRepr) -> Result<Self, Self::Error> {
        let keyed = match repr {
            MissingSpecRepr::Tagged(tagged) => {
                return Ok(match tagged {
                    TaggedSpec::None => MissingSpec::None,
                    TaggedSpec::Discrete { values } => MissingSpec::Discrete { values },
                    TaggedSpec::Range { min, max } => MissingSpec::Range { min, max },
                    TaggedSpec::RangeAndValue { min, max, value } => {
                        MissingSpec::RangeAndValue { min, max, value }
                    }
                })
            }
            MissingSpecRepr::Keyed(keyed) => keyed,
        };

        let bounds = match (keyed.range, keyed.min, keyed.max) {
            (Some(b), None, None) => Some((b.min, b.max)),
            (None, Some(min), Some(max)) => Some((min, max)),
            (None, None, None) => None,
            _ => return Err("missing range needs exactly one of `range` or `min`/`max`".into()),
        };

        let mut values = keyed.values.unwrap_or_default();
        values.extend(keyed.value);
        match (bounds, values.len()) {
            (None, 0) => Ok(MissingSpec::None),
            (None, _) => Ok(MissingSpec::Discrete { values }),
            (Some((min, max)), 0) => Ok(MissingSpec::Range { min, max }),
            (Some((min, max)), 1) => Ok(MissingSpec::RangeAndValue {
                min,
                max,
                value: values.remove(0),
            }),
            (Some(_), n) => Err(format!("a missing range allows one extra code, got {n}")),
        }
    }
}

fn in_range(value: &Value, min: f64, max: f64) -> bool {
    value.to_number().is_some_and(|x| x >= min && x <= max)
}

/// Classify a raw observation as missing
///
/// Null and blank strings are always missing; otherwise the variable's
/// specification decides. Ranges only apply to numeric types.
pub fn is_missing(value: &Value, spec: &MissingSpec, numeric: bool) -> bool {
    value.is_blank() || spec.is_user_missing(value, numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_missing() {
        let spec = MissingSpec::None;
        assert!(is_missing(&Value::Null, &spec, true));
        assert!(is_missing(&Value::from(""), &spec, false));
        assert!(!is_missing(&Value::from(0.0), &spec, true));
    }

    #[test]
    fn test_discrete_codes() {
        let spec = MissingSpec::discrete(["MISSING"]);
        assert!(is_missing(&Value::from("MISSING"), &spec, false));
        assert!(!is_missing(&Value::from("A"), &spec, false));

        let spec = MissingSpec::discrete([99.0]);
        assert!(is_missing(&Value::from("99"), &spec, true));
        assert!(is_missing(&Value::from(99.0), &spec, true));
        assert!(!is_missing(&Value::from(98.0), &spec, true));
    }

    #[test]
    fn test_range_inclusive() {
        let spec = MissingSpec::range(-9.0, -1.0);
        assert!(is_missing(&Value::from(-9.0), &spec, true));
        assert!(is_missing(&Value::from(-1.0), &spec, true));
        assert!(is_missing(&Value::from("-5"), &spec, true));
        assert!(!is_missing(&Value::from(0.0), &spec, true));
        // Ranges do not apply to string variables
        assert!(!is_missing(&Value::from("-5"), &spec, false));
    }

    #[test]
    fn test_range_and_value() {
        let spec = MissingSpec::RangeAndValue {
            min: 90.0,
            max: 95.0,
            value: Value::from(99.0),
        };
        assert!(is_missing(&Value::from(92.0), &spec, true));
        assert!(is_missing(&Value::from(99.0), &spec, true));
        assert!(!is_missing(&Value::from(97.0), &spec, true));
    }

    #[test]
    fn test_serde_tagged() {
        let spec: MissingSpec =
            serde_json::from_str(r#"{"kind":"range","min":1,"max":3}"#).unwrap();
        assert_eq!(spec, MissingSpec::range(1.0, 3.0));

        let spec: MissingSpec =
            serde_json::from_str(r#"{"kind":"discrete","values":["MISSING", 9]}"#).unwrap();
        assert_eq!(
            spec,
            MissingSpec::Discrete {
                values: vec![Value::from("MISSING"), Value::from(9.0)]
            }
        );

        let json = serde_json::to_value(MissingSpec::range(1.0, 3.0)).unwrap();
        assert_eq!(json["kind"], "range");
    }

    #[test]
    fn test_serde_inferred_from_keys() {
        let spec: MissingSpec = serde_json::from_str(r#"{"values":["MISSING"]}"#).unwrap();
        assert_eq!(spec, MissingSpec::discrete(["MISSING"]));

        let spec: MissingSpec = serde_json::from_str(r#"{"discrete":[9, 99]}"#).unwrap();
        assert_eq!(spec, MissingSpec::discrete([9.0, 99.0]));

        let spec: MissingSpec = serde_json::from_str(r#"{"min":-9,"max":-1}"#).unwrap();
        assert_eq!(spec, MissingSpec::range(-9.0, -1.0));

        let spec: MissingSpec = serde_json::from_str(r#"{"range":{"min":90,"max":95},"value":99}"#).unwrap();
        assert_eq!(
            spec,
            MissingSpec::RangeAndValue {
                min: 90.0,
                max: 95.0,
                value: Value::from(99.0)
            }
        );

        let spec: MissingSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec, MissingSpec::None);
    }

    #[test]
    fn test_serde_rejects_ambiguous_shapes() {
        assert!(serde_json::from_str::<MissingSpec>(r#"{"min":1}"#).is_err());
        assert!(serde_json::from_str::<MissingSpec>(r#"{"min":1,"max":2,"values":[3,4]}"#).is_err());
        assert!(serde_json::from_str::<MissingSpec>(r#"{"kind":"interval","min":1}"#).is_err());
        assert!(serde_json::from_str::<MissingSpec>(r#"{"vals":[1]}"#).is_err());
    }
}
