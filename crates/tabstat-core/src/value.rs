//! Raw observation values and numeric coercion

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single raw observation as it arrives from the data grid
///
/// Deserializes untagged from JSON `null`, numbers and strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// System-missing (no value entered)
    #[default]
    Null,
    /// Numeric cell
    Number(f64),
    /// Text cell, which may hold a number, a date or a string
    Text(String),
}

impl Value {
    /// True for null and empty (or whitespace-only) text
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(_) => false,
            Value::Text(s) => s.trim().is_empty(),
        }
    }

    /// Coerce to a finite number, if possible
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Number(x) => x.is_finite().then_some(*x),
            Value::Text(s) => parse_numeric(s),
        }
    }

    /// String-normalized form used for equality against missing codes and labels
    pub fn normalized(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(x) => format_number(*x),
            Value::Text(s) => s.trim().to_string(),
        }
    }

    /// Compare two values the way missing codes and value labels are matched
    ///
    /// Numeric-typed variables compare numerically when both sides coerce, so
    /// `"1.0"` matches `1`. Everything else falls back to the normalized string.
    pub fn matches(&self, other: &Value, numeric: bool) -> bool {
        if numeric {
            if let (Some(a), Some(b)) = (self.to_number(), other.to_number()) {
                return a == b;
            }
        }
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// True for finite numbers and strings that parse as finite numbers
pub fn is_numeric(value: &Value) -> bool {
    value.to_number().is_some()
}

/// Parse a numeric string accepting either `.` or `,` as the decimal separator
///
/// When both separators occur, the one appearing last is the decimal mark and
/// the other is treated as a grouping separator.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let normalized = match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    };
    normalized.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Render a number without a trailing `.0` for integral values
pub fn format_number(x: f64) -> String {
    format!("{x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(2.5).to_number(), Some(2.5));
        assert_relative_eq!(Value::from("3,25").to_number().unwrap(), 3.25);
        assert_relative_eq!(Value::from(" 7 ").to_number().unwrap(), 7.0);
        assert_relative_eq!(Value::from("1.234,5").to_number().unwrap(), 1234.5);
        assert_relative_eq!(Value::from("1,234.5").to_number().unwrap(), 1234.5);
        assert_eq!(Value::from("abc").to_number(), None);
        assert_eq!(Value::from("NaN").to_number(), None);
        assert_eq!(Value::from("inf").to_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).to_number(), None);
        assert_eq!(Value::Null.to_number(), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric(&Value::from(0.0)));
        assert!(is_numeric(&Value::from("-1e3")));
        assert!(!is_numeric(&Value::from("")));
        assert!(!is_numeric(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_blank_and_normalized() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("   ").is_blank());
        assert!(!Value::from(0.0).is_blank());
        assert_eq!(Value::from(3.0).normalized(), "3");
        assert_eq!(Value::from(" x ").normalized(), "x");
    }

    #[test]
    fn test_matches() {
        assert!(Value::from("1.0").matches(&Value::from(1.0), true));
        assert!(!Value::from("1.0").matches(&Value::from(1.0), false));
        assert!(Value::from("MISSING").matches(&Value::from("MISSING"), false));
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[1, "A", null, 2.5]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Number(1.0),
                Value::from("A"),
                Value::Null,
                Value::Number(2.5)
            ]
        );
    }
}
