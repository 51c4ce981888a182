use serde::{Deserialize, Serialize};
use std::fmt;

/// How the metrics summary for a response is derived.
///
/// The upstream sources disagree on where the metrics live, so both designs
/// are kept and the deployment picks one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsStrategy {
    /// Aggregate the metrics from the trade set.
    #[default]
    Computed,
    /// Read the metrics from the trailing columns of the last input row.
    Extracted,
}

impl fmt::Display for MetricsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsStrategy::Computed => f.write_str("computed"),
            MetricsStrategy::Extracted => f.write_str("extracted"),
        }
    }
}
