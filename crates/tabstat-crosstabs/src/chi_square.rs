//! Chi-square family of independence tests
//!
//! For observed counts `O` and expected counts `E = R·C / T`:
//!
//! - Pearson `χ² = Σ (O − E)² / E`
//! - likelihood ratio `G² = 2 Σ O·ln(O / E)` over cells with `O > 0`
//! - Yates continuity correction (2×2 only) `Σ (max(0, |O − E| − ½))² / E`
//!
//! All three use `df = (r − 1)(c − 1)`. Cells with `E = 0` are skipped.

use crate::table::ContingencyTable;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tabstat_core::{Error, Result};

/// Expected count below which a cell is flagged
pub const SMALL_EXPECTED: f64 = 5.0;

/// A test statistic with its degrees of freedom and upper-tail probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub value: f64,
    pub df: usize,
    /// Asymptotic significance; `None` when `df = 0`
    pub significance: Option<f64>,
}

impl ChiSquareTest {
    fn new(value: f64, df: usize) -> Result<Self> {
        Ok(Self {
            value,
            df,
            significance: upper_tail(value, df)?,
        })
    }
}

/// Upper-tail chi-square probability
pub fn upper_tail(value: f64, df: usize) -> Result<Option<f64>> {
    if df == 0 || !value.is_finite() {
        return Ok(None);
    }
    let dist = ChiSquared::new(df as f64).map_err(|e| {
        Error::Computation(format!("Failed to create chi-square distribution: {}", e))
    })?;
    Ok(Some((1.0 - dist.cdf(value.max(0.0))).clamp(0.0, 1.0)))
}

/// The chi-square tests of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareTests {
    pub pearson: ChiSquareTest,
    pub likelihood_ratio: ChiSquareTest,
    /// Present for 2×2 tables only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub continuity_correction: Option<ChiSquareTest>,
    pub n_valid: f64,
    /// Number of cells whose expected count is below 5
    pub cells_below_five: usize,
    pub minimum_expected: Option<f64>,
}

impl ChiSquareTests {
    /// Run every test; `None` for a table without valid cases
    pub fn compute(table: &ContingencyTable) -> Result<Option<Self>> {
        if table.is_empty() {
            return Ok(None);
        }
        let expected = table.expected();
        let df = degrees_of_freedom(table);
        let two_by_two = table.n_rows() == 2 && table.n_cols() == 2;

        let mut pearson = 0.0;
        let mut g2 = 0.0;
        let mut yates = 0.0;
        let mut cells_below_five = 0;
        let mut minimum_expected = f64::INFINITY;
        for (observed, expected) in table.counts.iter().zip(&expected) {
            for (&o, &e) in observed.iter().zip(expected) {
                minimum_expected = minimum_expected.min(e);
                if e < SMALL_EXPECTED {
                    cells_below_five += 1;
                }
                if e <= 0.0 {
                    continue;
                }
                let diff = o - e;
                pearson += diff * diff / e;
                if o > 0.0 {
                    g2 += o * (o / e).ln();
                }
                let corrected = (diff.abs() - 0.5).max(0.0);
                yates += corrected * corrected / e;
            }
        }

        Ok(Some(Self {
            pearson: ChiSquareTest::new(pearson, df)?,
            likelihood_ratio: ChiSquareTest::new(2.0 * g2, df)?,
            continuity_correction: if two_by_two {
                Some(ChiSquareTest::new(yates, df)?)
            } else {
                None
            },
            n_valid: table.grand_total,
            cells_below_five,
            minimum_expected: minimum_expected.is_finite().then_some(minimum_expected),
        }))
    }
}

/// `(r − 1)(c − 1)`, zero for a table with a single row or column
pub fn degrees_of_freedom(table: &ContingencyTable) -> usize {
    table.n_rows().saturating_sub(1) * table.n_cols().saturating_sub(1)
}
