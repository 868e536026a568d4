//! Weighted frequency tables
//!
//! Groups the valid cases of a variable by distinct value in ascending
//! natural order (numeric, chronological for dates, lexical for strings) and
//! reports frequency, percent of all cases, valid percent and cumulative
//! percent. User-missing codes get their own rows. Numeric variables also get
//! a statistics panel built on the descriptive moments, with median, modes and
//! requested percentiles.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, MissingSpec, Value, VariableDef};
//! use tabstat_frequency::{FrequencyCalculator, FrequencyRequest};
//!
//! let var = VariableDef::string("answer").with_missing(MissingSpec::discrete(["MISSING"]));
//! let data = vec![Value::from("A"), Value::from(""), Value::from("MISSING"), Value::from("B"), Value::Null];
//! let result = FrequencyCalculator::new().compute(&FrequencyRequest::new(var, data)).unwrap();
//!
//! assert_eq!(result.summary.valid, 2.0);
//! assert_eq!(result.summary.missing, 3.0);
//! ```

pub mod calculator;
pub mod table;

pub use calculator::{
    FrequencyBatch, FrequencyCalculator, FrequencyOptions, FrequencyRequest, FrequencyResult,
    FrequencyStatistics, VariableStatistics,
};
pub use tabstat_quantile::PercentileValue;
pub use table::{FrequencyRow, FrequencyTable, MissingRow};
