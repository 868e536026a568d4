//! Core traits shared by the calculators
//!
//! Each calculator is a stateless unit of work: a request goes in, a
//! self-contained result comes out. Algorithm-specific option types live in
//! their respective crates.

use crate::value::Value;
use crate::variable::VariableDef;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A one-shot statistics calculator
///
/// Implementations hold only their injected primitives, so calling
/// [`Calculator::compute`] twice with the same request yields identical
/// results.
pub trait Calculator: Send + Sync {
    /// Request accepted by this calculator
    type Request;

    /// Self-contained result
    type Output;

    /// Human-readable name of the procedure
    fn name(&self) -> &str;

    /// Run the calculation
    ///
    /// Only structurally invalid requests return `Err`; statistics that are
    /// undefined for the available cases come back as `None`.
    fn compute(&self, request: &Self::Request) -> Result<Self::Output>;

    /// Run the calculation for several requests in order
    fn compute_many(&self, requests: &[Self::Request]) -> Result<Vec<Self::Output>> {
        requests.iter().map(|r| self.compute(r)).collect()
    }
}

/// Request for a single-variable calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "O: Deserialize<'de> + Default"))]
pub struct VariableRequest<O> {
    pub variable: VariableDef,
    pub data: Vec<Value>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: O,
}

impl<O: Default> VariableRequest<O> {
    pub fn new(variable: VariableDef, data: Vec<Value>) -> Self {
        Self {
            variable,
            data,
            weights: None,
            options: O::default(),
        }
    }
}

impl<O> VariableRequest<O> {
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: O) -> Self {
        self.options = options;
        self
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }
}
