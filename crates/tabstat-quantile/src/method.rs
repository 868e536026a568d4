//! Percentile definitions

use serde::{Deserialize, Serialize};

/// How a percentile position between two order statistics is resolved
///
/// `W` is the total case weight and `p` the requested proportion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentileMethod {
    /// Weighted average at position `(W + 1)p`
    #[default]
    #[serde(alias = "Haverage", alias = "HAVERAGE")]
    Haverage,
    /// Weighted average at position `Wp`
    #[serde(alias = "Waverage", alias = "WAVERAGE")]
    Waverage,
    /// Observation closest to `Wp`
    #[serde(alias = "Round", alias = "ROUND")]
    Round,
    /// Empirical distribution function
    #[serde(alias = "Empirical", alias = "EMPIRICAL")]
    Empirical,
    /// Empirical distribution function with averaging on exact hits
    #[serde(alias = "Aempirical", alias = "AEMPIRICAL")]
    Aempirical,
}

impl PercentileMethod {
    pub const ALL: [PercentileMethod; 5] = [
        PercentileMethod::Haverage,
        PercentileMethod::Waverage,
        PercentileMethod::Round,
        PercentileMethod::Empirical,
        PercentileMethod::Aempirical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Haverage => "Weighted Average (definition 1)",
            Self::Waverage => "Weighted Average (definition 2)",
            Self::Round => "Closest Observation",
            Self::Empirical => "Empirical Distribution Function",
            Self::Aempirical => "Empirical Distribution Function with Averaging",
        }
    }
}
