//! Request/response message contract
//!
//! Every calculator is reachable through one JSON message shape. A request
//! carries a single `variable` with its `data`, or a `variableData` list for
//! batched mode; `weights` and `options` are optional. The response is
//! `{"success": true, "results": ...}` or `{"success": false, "error": "..."}`.
//! [`handle_json`] never panics: malformed JSON, structural errors and
//! panics inside a calculator all come back as failure responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use tabstat_core::{Calculator, Error, Result, Value, VariableDef, VariableRequest};
use tabstat_crosstabs::{CrosstabsCalculator, CrosstabsRequest, CrosstabsResult};
use tabstat_descriptive::{DescriptiveCalculator, DescriptiveOptions, DescriptiveResult};
use tabstat_examine::{ExamineCalculator, ExamineOptions, ExamineResult};
use tabstat_frequency::{FrequencyBatch, FrequencyCalculator, FrequencyOptions, FrequencyResult};
use tracing::{debug, instrument, warn};

/// The procedures reachable through the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorKind {
    Descriptive,
    Frequency,
    Crosstabs,
    Examine,
}

impl FromStr for CalculatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptive" | "descriptives" => Ok(Self::Descriptive),
            "frequency" | "frequencies" => Ok(Self::Frequency),
            "crosstabs" | "crosstab" => Ok(Self::Crosstabs),
            "examine" | "explore" => Ok(Self::Examine),
            other => Err(Error::InvalidInput(format!("Unknown calculator: {other}"))),
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Descriptive => "descriptive",
            Self::Frequency => "frequency",
            Self::Crosstabs => "crosstabs",
            Self::Examine => "examine",
        };
        f.write_str(name)
    }
}

/// One variable of a batched request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    pub variable: VariableDef,
    pub data: Vec<Value>,
    /// Overrides the request-level weights for this variable
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

/// Wire request of a single-variable calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "O: Deserialize<'de> + Default"))]
pub struct WorkerRequest<O> {
    #[serde(default)]
    pub variable: Option<VariableDef>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: O,
    #[serde(default)]
    pub variable_data: Option<Vec<VariableData>>,
}

impl<O: Default> WorkerRequest<O> {
    pub fn single(variable: VariableDef, data: Vec<Value>) -> Self {
        Self {
            variable: Some(variable),
            data: Some(data),
            weights: None,
            options: O::default(),
            variable_data: None,
        }
    }

    pub fn batch(variable_data: Vec<VariableData>) -> Self {
        Self {
            variable: None,
            data: None,
            weights: None,
            options: O::default(),
            variable_data: Some(variable_data),
        }
    }
}

impl<O: Clone> WorkerRequest<O> {
    pub fn with_options(mut self, options: O) -> Self {
        self.options = options;
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn is_batch(&self) -> bool {
        self.variable_data.is_some()
    }

    /// Split into per-variable calculator requests
    pub fn into_requests(self) -> Result<Vec<VariableRequest<O>>> {
        let Self {
            variable,
            data,
            weights,
            options,
            variable_data,
        } = self;
        if let Some(batch) = variable_data {
            return Ok(batch
                .into_iter()
                .map(|entry| VariableRequest {
                    variable: entry.variable,
                    data: entry.data,
                    weights: entry.weights.or_else(|| weights.clone()),
                    options: options.clone(),
                })
                .collect());
        }
        let variable = variable.ok_or_else(|| Error::missing_field("variable"))?;
        let data = data.ok_or_else(|| Error::missing_field("data"))?;
        Ok(vec![VariableRequest {
            variable,
            data,
            weights,
            options,
        }])
    }
}

/// A single result, or one per variable in batched mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Results<T> {
    Single(T),
    Batch(Vec<T>),
}

/// Frequencies results; batches are grouped into statistics and tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyResults {
    Single(Box<FrequencyResult>),
    Batch(FrequencyBatch),
}

/// Wire response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub results: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl<T> Response<T> {
    pub fn ok(results: T) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T>> for Response<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(results) => Self::ok(results),
            Err(e) => Self::failure(e),
        }
    }
}

/// Run a calculator over several requests, keeping their order
#[cfg(feature = "parallel")]
pub fn compute_all<C>(calculator: &C, requests: &[C::Request]) -> Result<Vec<C::Output>>
where
    C: Calculator,
    C::Request: Sync,
    C::Output: Send,
{
    use rayon::prelude::*;
    requests.par_iter().map(|r| calculator.compute(r)).collect()
}

/// Run a calculator over several requests, keeping their order
#[cfg(not(feature = "parallel"))]
pub fn compute_all<C: Calculator>(calculator: &C, requests: &[C::Request]) -> Result<Vec<C::Output>> {
    calculator.compute_many(requests)
}

fn run<C, O>(calculator: &C, request: WorkerRequest<O>) -> Result<Results<C::Output>>
where
    C: Calculator<Request = VariableRequest<O>>,
    VariableRequest<O>: Sync,
    C::Output: Send,
    O: Clone,
{
    let batched = request.is_batch();
    let requests = request.into_requests()?;
    debug!(variables = requests.len(), batched, "dispatching requests");
    let mut outputs = compute_all(calculator, &requests)?;
    match (batched, outputs.pop()) {
        (false, Some(output)) => Ok(Results::Single(output)),
        (false, None) => Err(Error::Computation("Calculator produced no result".to_string())),
        (true, last) => {
            outputs.extend(last);
            Ok(Results::Batch(outputs))
        }
    }
}

/// Descriptives for one variable or a batch
pub fn descriptives(request: WorkerRequest<DescriptiveOptions>) -> Result<Results<DescriptiveResult>> {
    run(&DescriptiveCalculator::new(), request)
}

/// Frequencies for one variable, or a `{statistics, frequencyTables}` batch
pub fn frequencies(request: WorkerRequest<FrequencyOptions>) -> Result<FrequencyResults> {
    Ok(match run(&FrequencyCalculator::new(), request)? {
        Results::Single(result) => FrequencyResults::Single(Box::new(result)),
        Results::Batch(results) => FrequencyResults::Batch(FrequencyBatch::from_results(results)),
    })
}

/// Crosstabs of one row/column pair
pub fn crosstabs(request: CrosstabsRequest) -> Result<CrosstabsResult> {
    CrosstabsCalculator::new().compute(&request)
}

/// Examine for one variable or a batch
pub fn examine(request: WorkerRequest<ExamineOptions>) -> Result<Results<ExamineResult>> {
    run(&ExamineCalculator::new(), request)
}

fn respond<R, T>(body: &str, handler: impl FnOnce(R) -> Result<T>) -> Result<String>
where
    R: for<'de> Deserialize<'de>,
    T: Serialize,
{
    let request: R = serde_json::from_str(body)?;
    let response = Response::from(handler(request));
    Ok(serde_json::to_string(&response)?)
}

fn dispatch(kind: CalculatorKind, body: &str) -> Result<String> {
    match kind {
        CalculatorKind::Descriptive => respond(body, descriptives),
        CalculatorKind::Frequency => respond(body, frequencies),
        CalculatorKind::Crosstabs => respond(body, crosstabs),
        CalculatorKind::Examine => respond(body, examine),
    }
}

fn failure_json(error: impl fmt::Display) -> String {
    let response: Response<()> = Response::failure(error);
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"success":false,"error":"unserializable error"}"#.to_string())
}

/// Handle one JSON request for the named calculator and return the JSON response
#[instrument(skip(body), fields(bytes = body.len()))]
pub fn handle_json(kind: &str, body: &str) -> String {
    let kind = match kind.parse::<CalculatorKind>() {
        Ok(kind) => kind,
        Err(e) => return failure_json(e),
    };
    match catch_unwind(AssertUnwindSafe(|| dispatch(kind, body))) {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(%kind, error = %e, "request failed");
            failure_json(e)
        }
        Err(_) => {
            warn!(%kind, "calculator panicked");
            failure_json(format!("{kind} calculator failed unexpectedly"))
        }
    }
}
