//! The Crosstabs procedure

use crate::chi_square::ChiSquareTests;
use crate::table::{ContingencyTable, Matrix, NonIntegerWeights, TableAccumulator};
use serde::{Deserialize, Serialize};
use tabstat_core::{
    case_weight, validate_weights, Calculator, CasePrimitives, CaseStatus, CaseSummary, Error,
    Result, StandardPrimitives, Value, VariableDef,
};
use tracing::{debug, instrument};

/// Which cell views are materialised in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellOptions {
    pub observed: bool,
    pub expected: bool,
    /// Row percentages
    pub row: bool,
    /// Column percentages
    pub column: bool,
    /// Percentages of the grand total
    pub total: bool,
    pub residuals: bool,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            observed: true,
            expected: false,
            row: false,
            column: false,
            total: false,
            residuals: false,
        }
    }
}

impl CellOptions {
    /// Every view
    pub fn all() -> Self {
        Self {
            observed: true,
            expected: true,
            row: true,
            column: true,
            total: true,
            residuals: true,
        }
    }
}

/// Options for the Crosstabs procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrosstabsOptions {
    pub cells: CellOptions,
    #[serde(alias = "nonintegerWeights")]
    pub non_integer_weights: NonIntegerWeights,
    pub chi_square: bool,
}

impl Default for CrosstabsOptions {
    fn default() -> Self {
        Self {
            cells: CellOptions::default(),
            non_integer_weights: NonIntegerWeights::NoAdjustment,
            chi_square: true,
        }
    }
}

impl CrosstabsOptions {
    pub fn with_cells(mut self, cells: CellOptions) -> Self {
        self.cells = cells;
        self
    }

    pub fn with_non_integer_weights(mut self, policy: NonIntegerWeights) -> Self {
        self.non_integer_weights = policy;
        self
    }

    pub fn without_chi_square(mut self) -> Self {
        self.chi_square = false;
        self
    }
}

/// The row and column variables of a crosstab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabVariables {
    pub row: VariableDef,
    pub col: VariableDef,
}

/// One case: its value on the row and on the column variable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseRecord {
    pub row: Value,
    pub col: Value,
}

impl CaseRecord {
    pub fn new(row: impl Into<Value>, col: impl Into<Value>) -> Self {
        Self {
            row: row.into(),
            col: col.into(),
        }
    }
}

/// Request for the Crosstabs procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosstabsRequest {
    pub variable: CrosstabVariables,
    pub data: Vec<CaseRecord>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: CrosstabsOptions,
}

impl CrosstabsRequest {
    pub fn new(row: VariableDef, col: VariableDef, data: Vec<CaseRecord>) -> Self {
        Self {
            variable: CrosstabVariables { row, col },
            data,
            weights: None,
            options: CrosstabsOptions::default(),
        }
    }

    /// Pair two index-aligned columns into case records
    pub fn from_columns(
        row: VariableDef,
        col: VariableDef,
        row_data: Vec<Value>,
        col_data: Vec<Value>,
    ) -> Result<Self> {
        if row_data.len() != col_data.len() {
            return Err(Error::size_mismatch(
                row_data.len(),
                col_data.len(),
                "crosstab column data",
            ));
        }
        let data = row_data
            .into_iter()
            .zip(col_data)
            .map(|(row, col)| CaseRecord { row, col })
            .collect();
        Ok(Self::new(row, col, data))
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: CrosstabsOptions) -> Self {
        self.options = options;
        self
    }
}

/// Cell views selected by [`CellOptions`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellViews {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub observed: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expected: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row_percent: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_percent: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_percent: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub residuals: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub standardized_residuals: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adjusted_residuals: Option<Matrix>,
}

impl CellViews {
    pub fn from_table(table: &ContingencyTable, cells: &CellOptions) -> Self {
        Self {
            observed: cells.observed.then(|| table.counts.clone()),
            expected: cells.expected.then(|| table.expected()),
            row_percent: cells.row.then(|| table.row_percentages()),
            column_percent: cells.column.then(|| table.column_percentages()),
            total_percent: cells.total.then(|| table.total_percentages()),
            residuals: cells.residuals.then(|| table.residuals()),
            standardized_residuals: cells.residuals.then(|| table.standardized_residuals()),
            adjusted_residuals: cells.residuals.then(|| table.adjusted_residuals()),
        }
    }
}

/// Result of the Crosstabs procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosstabsResult {
    pub row_variable: String,
    pub col_variable: String,
    pub table: ContingencyTable,
    pub cells: CellViews,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub chi_square: Option<ChiSquareTests>,
    /// A case is valid only when both of its values are valid
    pub summary: CaseSummary,
}

/// Weighted two-way contingency table calculator
#[derive(Debug, Clone, Default)]
pub struct CrosstabsCalculator<P: CasePrimitives = StandardPrimitives> {
    primitives: P,
}

impl CrosstabsCalculator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CasePrimitives> CrosstabsCalculator<P> {
    pub fn with_primitives(primitives: P) -> Self {
        Self { primitives }
    }

    /// Accumulate the contingency table and the case summary
    ///
    /// Summary weights follow the non-integer weight policy, so the valid
    /// count always equals the table's grand total.
    pub fn table(&self, request: &CrosstabsRequest) -> Result<(ContingencyTable, CaseSummary)> {
        let CrosstabVariables { row, col } = &request.variable;
        let weights = request.weights.as_deref();
        validate_weights(request.data.len(), weights)?;

        let policy = request.options.non_integer_weights;
        let mut accumulator = TableAccumulator::new(policy);
        let mut summary = CaseSummary::default();
        for (index, record) in request.data.iter().enumerate() {
            let Some(weight) = case_weight(weights, index) else {
                continue;
            };
            let keys = match (
                self.primitives.classify(row, &record.row),
                self.primitives.classify(col, &record.col),
            ) {
                (CaseStatus::Valid, CaseStatus::Valid) => self
                    .primitives
                    .category_key(row, &record.row)
                    .zip(self.primitives.category_key(col, &record.col)),
                _ => None,
            };
            match keys {
                Some((r, c)) => accumulator.add(r, c, weight),
                None => summary.record(CaseStatus::SystemMissing, policy.case_weight(weight)),
            }
        }
        let table = accumulator.finish(&self.primitives, row, col);
        summary.record(CaseStatus::Valid, table.grand_total);
        Ok((table, summary))
    }
}

impl<P: CasePrimitives> Calculator for CrosstabsCalculator<P> {
    type Request = CrosstabsRequest;
    type Output = CrosstabsResult;

    fn name(&self) -> &str {
        "Crosstabs"
    }

    #[instrument(skip_all, fields(row = %request.variable.row.name, col = %request.variable.col.name))]
    fn compute(&self, request: &CrosstabsRequest) -> Result<CrosstabsResult> {
        request.variable.row.validate()?;
        request.variable.col.validate()?;

        let (table, summary) = self.table(request)?;
        debug!(
            rows = table.n_rows(),
            cols = table.n_cols(),
            total = table.grand_total,
            policy = ?request.options.non_integer_weights,
            "built contingency table"
        );

        let chi_square = if request.options.chi_square {
            ChiSquareTests::compute(&table)?
        } else {
            None
        };

        Ok(CrosstabsResult {
            row_variable: request.variable.row.name.clone(),
            col_variable: request.variable.col.name.clone(),
            cells: CellViews::from_table(&table, &request.options.cells),
            table,
            chi_square,
            summary,
        })
    }
}
