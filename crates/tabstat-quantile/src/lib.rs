//! Weighted percentile estimation
//!
//! This crate provides the percentile definitions used by the Frequency and
//! Examine calculators:
//!
//! - **HAVERAGE**: weighted average at `(W + 1)p` (the default)
//! - **WAVERAGE**: weighted average at `Wp`
//! - **ROUND**: observation closest to `Wp`
//! - **EMPIRICAL** / **AEMPIRICAL**: empirical distribution function variants
//! - **Tukey's hinges**: rank-based quartile analogue
//!
//! # Example
//!
//! ```rust
//! use tabstat_quantile::{CumulativeSample, PercentileMethod};
//!
//! let sample = CumulativeSample::new(&[5.0, 1.0, 3.0, 2.0, 4.0], &[1.0; 5]);
//! let q1 = sample.percentile(0.25, PercentileMethod::Haverage).unwrap();
//! assert_eq!(q1, 1.5);
//! ```

pub mod hinges;
pub mod method;
pub mod weighted;

pub use hinges::{tukey_hinges, Hinges};
pub use method::PercentileMethod;
pub use weighted::{
    check_percentile, weighted_median, weighted_percentiles, CumulativeSample, PercentileValue,
};
