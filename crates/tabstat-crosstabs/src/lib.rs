//! Weighted two-way contingency tables
//!
//! A case enters the table only when both its row and column values are
//! valid under their own missing-value specifications. Categories are sorted
//! in natural order on each axis; date categories are decoded for ordering and
//! re-encoded for display.
//!
//! Fractional case weights are handled according to [`NonIntegerWeights`].
//! Row, column and total percentages, expected counts and residuals are all
//! derived from the accumulated counts, so the views always agree with the
//! table. The chi-square family ([`ChiSquareTests`]) reports Pearson,
//! likelihood-ratio and, for 2×2 tables, Yates-corrected statistics with their
//! asymptotic significance.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, VariableDef};
//! use tabstat_crosstabs::{CaseRecord, CrosstabsCalculator, CrosstabsRequest};
//!
//! let data = vec![
//!     CaseRecord::new("x", "p"), CaseRecord::new("x", "p"), CaseRecord::new("x", "p"),
//!     CaseRecord::new("x", "q"), CaseRecord::new("y", "p"),
//!     CaseRecord::new("y", "q"), CaseRecord::new("y", "q"), CaseRecord::new("y", "q"),
//! ];
//! let request = CrosstabsRequest::new(VariableDef::string("a"), VariableDef::string("b"), data);
//! let result = CrosstabsCalculator::new().compute(&request).unwrap();
//! let chi = result.chi_square.unwrap();
//!
//! assert!((chi.pearson.value - 2.0).abs() < 1e-12);
//! assert_eq!(chi.pearson.df, 1);
//! ```

pub mod calculator;
pub mod chi_square;
pub mod table;

pub use calculator::{
    CaseRecord, CellOptions, CellViews, CrosstabVariables, CrosstabsCalculator, CrosstabsOptions,
    CrosstabsRequest, CrosstabsResult,
};
pub use chi_square::{degrees_of_freedom, upper_tail, ChiSquareTest, ChiSquareTests, SMALL_EXPECTED};
pub use table::{Category, ContingencyTable, Matrix, NonIntegerWeights, TableAccumulator};
