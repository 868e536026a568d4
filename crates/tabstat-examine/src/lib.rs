//! Exploratory statistics for a single variable
//!
//! The Examine procedure combines the descriptive moments with robust and
//! order-based summaries:
//!
//! - confidence interval for the mean (Student t)
//! - trimmed mean by weighted overlap ([`trimmed_mean`])
//! - Huber, Tukey biweight, Hampel and Andrews M-estimators ([`MEstimates`])
//! - percentiles under a selectable [`PercentileMethod`](tabstat_quantile::PercentileMethod)
//!   and Tukey's hinges
//! - the highest and lowest valid cases ([`Extremes`])
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, Value, VariableDef};
//! use tabstat_examine::{ExamineCalculator, ExamineRequest};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().map(Value::from).collect();
//! let request = ExamineRequest::new(VariableDef::numeric("x"), data);
//! let result = ExamineCalculator::new().compute(&request).unwrap();
//!
//! let huber = result.m_estimators.unwrap().huber.estimate.unwrap();
//! assert!((huber - 3.0).abs() < 1e-9);
//! assert!((result.stats.trimmed_mean.unwrap() - 3.0).abs() < 1e-12);
//! ```

pub mod calculator;
pub mod extremes;
pub mod m_estimators;
pub mod trimmed;

pub use calculator::{
    ExamineCalculator, ExamineOptions, ExamineRequest, ExamineResult, ExamineStats, MeanInterval,
    EXAMINE_PERCENTILES,
};
pub use extremes::{ExtremeValue, Extremes, DEFAULT_EXTREME_COUNT};
pub use m_estimators::{m_estimate, weighted_mad, MEstimate, MEstimates, MEstimator, MEstimatorConfig};
pub use trimmed::{check_trim, trimmed_mean, DEFAULT_TRIM};
