//! # tabstat
//!
//! A weighted statistics engine for survey-style data. Four calculators share
//! one primitive layer for missing values, value labels, numeric coercion and
//! dates:
//!
//! - **Descriptives**: weighted moments with bias-corrected skewness and kurtosis
//! - **Frequencies**: ordered frequency tables, modes and percentile panels
//! - **Crosstabs**: contingency tables with the chi-square family
//! - **Examine**: trimmed mean, M-estimators, percentiles, hinges and extremes
//!
//! Every calculator takes a request and returns a self-contained result;
//! nothing is kept between calls. The [`worker`] module exposes the same
//! calculators through a JSON request/response contract.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabstat::prelude::*;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().map(Value::from).collect();
//! let request = DescriptiveRequest::new(VariableDef::numeric("score"), data)
//!     .with_weights(vec![2.0, 1.0, 1.0, 1.0, 1.0]);
//! let result = DescriptiveCalculator::new().compute(&request).unwrap();
//!
//! assert_eq!(result.stats.n, 6.0);
//! assert!((result.stats.mean.unwrap() - 16.0 / 6.0).abs() < 1e-12);
//! ```
//!
//! ## Worker contract
//!
//! ```rust
//! let body = r#"{"variable": {"name": "grade", "type": "string",
//!                 "missing": {"kind": "discrete", "values": ["MISSING"]}},
//!               "data": ["A", "", "MISSING", "B", null]}"#;
//! let response: serde_json::Value =
//!     serde_json::from_str(&tabstat::worker::handle_json("frequency", body)).unwrap();
//!
//! assert_eq!(response["success"], true);
//! assert_eq!(response["results"]["summary"]["missing"], 3.0);
//! ```
//!
//! ## Features
//!
//! - `parallel`: run batched variables on the rayon thread pool

pub mod worker;

// Re-export workspace crates
pub use tabstat_core;
pub use tabstat_crosstabs;
pub use tabstat_descriptive;
pub use tabstat_examine;
pub use tabstat_frequency;
pub use tabstat_quantile;

pub use tabstat_core::{Calculator, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use tabstat_core::prelude::*;
    pub use tabstat_crosstabs::{
        CaseRecord, CellOptions, CrosstabsCalculator, CrosstabsOptions, CrosstabsRequest,
        NonIntegerWeights,
    };
    pub use tabstat_descriptive::{DescriptiveCalculator, DescriptiveOptions, DescriptiveRequest};
    pub use tabstat_examine::{ExamineCalculator, ExamineOptions, ExamineRequest, MEstimatorConfig};
    pub use tabstat_frequency::{FrequencyCalculator, FrequencyOptions, FrequencyRequest};
    pub use tabstat_quantile::PercentileMethod;
}
