//! Weighted descriptive statistics
//!
//! Computes N, mean, variance, standard deviation, standard error of the
//! mean, range and bias-corrected skewness and kurtosis (with standard
//! errors) over the valid, positively weighted cases of a variable.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, Value, VariableDef};
//! use tabstat_descriptive::{DescriptiveCalculator, DescriptiveRequest};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0].map(Value::from).to_vec();
//! let request = DescriptiveRequest::new(VariableDef::numeric("x"), data);
//! let result = DescriptiveCalculator::new().compute(&request).unwrap();
//!
//! assert_eq!(result.stats.mean, Some(3.0));
//! assert_eq!(result.stats.variance, Some(2.5));
//! ```

pub mod calculator;
pub mod moments;

pub use calculator::{
    DescriptiveCalculator, DescriptiveOptions, DescriptiveRequest, DescriptiveResult,
    DescriptiveStats,
};
pub use moments::{kurtosis_std_error, skewness_std_error, WeightedMoments};
