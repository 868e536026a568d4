//! Core types for the tabstat statistics engine
//!
//! This crate provides the primitive layer every calculator builds on:
//!
//! - [`Value`]: raw observations with numeric coercion (`.` or `,` decimals)
//! - [`VariableDef`] and [`MissingSpec`]: variable metadata and user-missing codes
//! - [`DateCodec`]: lossless conversion between `dd-mm-yyyy` strings and day ordinals
//! - [`CasePrimitives`]: the injection seam calculators use to classify cases
//! - [`WeightedCases`]: valid `(value, weight)` pairs plus a valid/missing summary
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{MissingSpec, StandardPrimitives, Value, VariableDef, WeightedCases};
//!
//! let var = VariableDef::numeric("age").with_missing(MissingSpec::discrete([-1.0]));
//! let data = vec![Value::from(21.0), Value::from(-1.0), Value::Null, Value::from("34")];
//! let cases = WeightedCases::collect(&StandardPrimitives::new(), &var, &data, None).unwrap();
//!
//! assert_eq!(cases.values, vec![21.0, 34.0]);
//! assert_eq!(cases.summary.missing, 2.0);
//! ```

pub mod date;
pub mod error;
pub mod missing;
pub mod primitives;
pub mod sample;
pub mod traits;
pub mod value;
pub mod variable;

pub use date::{
    date_string_to_ordinal, ordinal_to_date_string, DateCodec, PatternDateCodec,
    DEFAULT_DATE_FORMAT,
};
pub use error::{Error, Result};
pub use missing::{is_missing, MissingSpec};
pub use primitives::{CaseKey, CasePrimitives, CaseStatus, StandardPrimitives};
pub use sample::{case_weight, validate_weights, CaseSummary, WeightedCases};
pub use traits::{Calculator, VariableRequest};
pub use value::{format_number, is_numeric, parse_numeric, Value};
pub use variable::{map_value_label, round_to, MeasurementLevel, ValueLabel, VariableDef, VariableType};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Threshold below which a variance is treated as zero
pub const VARIANCE_EPSILON: f64 = 1e-12;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CasePrimitives, CaseStatus, CaseSummary, Calculator, Error, MissingSpec, Result,
        StandardPrimitives, Value, VariableDef, VariableRequest, VariableType, WeightedCases,
    };
}
