//! Error types for the tabstat calculators
//!
//! Provides a unified error type for all tabstat crates. Only structural
//! problems with a request become errors; a statistic that is undefined for
//! the available number of cases is reported as `None` instead.

use thiserror::Error;

/// Core error type for statistics requests
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structurally invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required request field was absent or empty
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Insufficient data for an operation that cannot degrade to `None`
    #[error("Insufficient data: expected at least {expected} cases, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Request or response (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a required field that was not supplied
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    /// Create an error for index-aligned vectors of different lengths
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a percentile outside [0, 100]
    pub fn invalid_percentile(p: f64) -> Self {
        Self::InvalidParameter(format!("Percentile {p} must be in [0, 100]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("trim must be below 0.5".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: trim must be below 0.5");

        let err = Error::missing_field("variable.name");
        assert_eq!(err.to_string(), "Missing required field: variable.name");

        let err = Error::InsufficientData { expected: 3, actual: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 3 cases, got 1"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(5, 4, "weight vector");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in weight vector: expected 5, got 4"
        );

        let err = Error::invalid_percentile(120.0);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Percentile 120 must be in [0, 100]"
        );
    }

    #[test]
    fn test_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
