//! Contingency tables and their derived cell views

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tabstat_core::{CaseKey, CasePrimitives, Value, VariableDef};

/// Row-major matrix of cell values
pub type Matrix = Vec<Vec<f64>>;

/// Policy for fractional case weights
///
/// The table-level variant is the interpretation chosen for post-aggregation
/// rounding; cell-level variants adjust each case weight before it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NonIntegerWeights {
    /// Accumulate raw weights; counts may be fractional
    #[default]
    NoAdjustment,
    /// Round each case weight to the nearest integer before accumulation
    RoundCell,
    /// Truncate each case weight before accumulation
    TruncateCell,
    /// Accumulate raw weights, then round every cell count
    RoundTable,
}

impl NonIntegerWeights {
    /// Weight a single case contributes to its cell
    pub fn case_weight(self, weight: f64) -> f64 {
        match self {
            Self::RoundCell => weight.round(),
            Self::TruncateCell => weight.trunc(),
            Self::NoAdjustment | Self::RoundTable => weight,
        }
    }

    /// Final adjustment of an accumulated cell count
    pub fn cell_count(self, count: f64) -> f64 {
        match self {
            Self::RoundTable => count.round(),
            _ => count,
        }
    }
}

/// A category along one axis of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub value: Value,
    pub label: String,
}

/// Two-way table of weighted counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyTable {
    pub row_categories: Vec<Category>,
    pub col_categories: Vec<Category>,
    /// Observed weighted counts, `counts[row][col]`
    pub counts: Matrix,
    pub row_totals: Vec<f64>,
    pub col_totals: Vec<f64>,
    pub grand_total: f64,
}

/// Accumulates weighted cases into cells keyed by category
#[derive(Debug, Default)]
pub struct TableAccumulator {
    cells: BTreeMap<(CaseKey, CaseKey), f64>,
    policy: NonIntegerWeights,
}

impl TableAccumulator {
    pub fn new(policy: NonIntegerWeights) -> Self {
        Self {
            cells: BTreeMap::new(),
            policy,
        }
    }

    /// Add one case with both sides valid
    pub fn add(&mut self, row: CaseKey, col: CaseKey, weight: f64) {
        *self.cells.entry((row, col)).or_default() += self.policy.case_weight(weight);
    }

    /// Finish the table; categories whose adjusted total is zero are dropped
    pub fn finish<P: CasePrimitives + ?Sized>(
        self,
        primitives: &P,
        row_var: &VariableDef,
        col_var: &VariableDef,
    ) -> ContingencyTable {
        let policy = self.policy;
        let cells: BTreeMap<(CaseKey, CaseKey), f64> = self
            .cells
            .into_iter()
            .map(|(key, count)| (key, policy.cell_count(count)))
            .filter(|(_, count)| *count > 0.0)
            .collect();

        let rows: BTreeSet<&CaseKey> = cells.keys().map(|(r, _)| r).collect();
        let cols: BTreeSet<&CaseKey> = cells.keys().map(|(_, c)| c).collect();
        let row_index: BTreeMap<&CaseKey, usize> = rows.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let col_index: BTreeMap<&CaseKey, usize> = cols.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        let mut counts = vec![vec![0.0; cols.len()]; rows.len()];
        for ((r, c), count) in &cells {
            counts[row_index[r]][col_index[c]] = *count;
        }

        let category = |var: &VariableDef, key: &CaseKey| {
            let value = primitives.render_key(key);
            Category {
                label: primitives.label(var, &value),
                value,
            }
        };
        let row_categories = rows.iter().map(|k| category(row_var, *k)).collect();
        let col_categories = cols.iter().map(|k| category(col_var, *k)).collect();
        ContingencyTable::with_categories(row_categories, col_categories, counts)
    }
}

fn ratio_matrix(counts: &Matrix, denominator: impl Fn(usize, usize) -> f64) -> Matrix {
    counts
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &o)| {
                    let d = denominator(i, j);
                    if d > 0.0 {
                        100.0 * o / d
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

impl ContingencyTable {
    /// Build from categories and counts, deriving the totals
    pub fn with_categories(
        row_categories: Vec<Category>,
        col_categories: Vec<Category>,
        counts: Matrix,
    ) -> Self {
        let row_totals: Vec<f64> = counts.iter().map(|row| row.iter().sum()).collect();
        let col_totals: Vec<f64> = (0..col_categories.len())
            .map(|j| counts.iter().map(|row| row[j]).sum())
            .collect();
        let grand_total = row_totals.iter().sum();
        Self {
            row_categories,
            col_categories,
            counts,
            row_totals,
            col_totals,
            grand_total,
        }
    }

    /// Build from a bare count matrix with categories numbered from 1
    pub fn from_counts(counts: Matrix) -> Self {
        let n_cols = counts.first().map_or(0, Vec::len);
        let numbered = |n: usize| {
            (1..=n)
                .map(|i| Category {
                    value: Value::from(i as f64),
                    label: i.to_string(),
                })
                .collect()
        };
        Self::with_categories(numbered(counts.len()), numbered(n_cols), counts)
    }

    pub fn n_rows(&self) -> usize {
        self.row_categories.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grand_total <= 0.0
    }

    /// Expected counts under independence, `Rᵢ·Cⱼ / T`
    pub fn expected(&self) -> Matrix {
        let t = self.grand_total;
        self.row_totals
            .iter()
            .map(|&r| {
                self.col_totals
                    .iter()
                    .map(|&c| if t > 0.0 { r * c / t } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    /// Percent of row total
    pub fn row_percentages(&self) -> Matrix {
        ratio_matrix(&self.counts, |i, _| self.row_totals[i])
    }

    /// Percent of column total
    pub fn column_percentages(&self) -> Matrix {
        ratio_matrix(&self.counts, |_, j| self.col_totals[j])
    }

    /// Percent of grand total
    pub fn total_percentages(&self) -> Matrix {
        ratio_matrix(&self.counts, |_, _| self.grand_total)
    }

    /// Observed minus expected
    pub fn residuals(&self) -> Matrix {
        self.zip_expected(|o, e, _, _| o - e)
    }

    /// `(O − E) / √E`
    pub fn standardized_residuals(&self) -> Matrix {
        self.zip_expected(|o, e, _, _| if e > 0.0 { (o - e) / e.sqrt() } else { 0.0 })
    }

    /// `(O − E) / √(E(1 − Rᵢ/T)(1 − Cⱼ/T))`
    pub fn adjusted_residuals(&self) -> Matrix {
        let t = self.grand_total;
        self.zip_expected(|o, e, i, j| {
            let variance = e * (1.0 - self.row_totals[i] / t) * (1.0 - self.col_totals[j] / t);
            if variance > 0.0 {
                (o - e) / variance.sqrt()
            } else {
                0.0
            }
        })
    }

    fn zip_expected(&self, f: impl Fn(f64, f64, usize, usize) -> f64) -> Matrix {
        let expected = self.expected();
        self.counts
            .iter()
            .zip(&expected)
            .enumerate()
            .map(|(i, (observed, expected))| {
                observed
                    .iter()
                    .zip(expected)
                    .enumerate()
                    .map(|(j, (&o, &e))| f(o, e, i, j))
                    .collect()
            })
            .collect()
    }
}
