use serde::{Deserialize, Serialize};

/// A single aggregate snapshot of trading performance.
///
/// This struct is the output of both metric derivation strategies and the
/// `metrics` half of the `/api/trading-data` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Percentage of winning trades, 0 to 100.
    pub win_rate: f64,
    pub total_trades: u64,
    pub account_value: f64,
    pub stop_loss: f64,

    // Extremes over all trades, winners and losers alike.
    pub largest_win: f64,
    pub largest_loss: f64,

    pub average_win: f64,
    pub average_loss: f64,

    /// Gross wins over absolute gross losses. Infinite when nothing lost.
    #[serde(with = "core_types::float::non_finite")]
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
}

impl MetricsSummary {
    /// Creates a new, zeroed-out summary.
    pub fn new() -> Self {
        Self {
            win_rate: 0.0,
            total_trades: 0,
            account_value: 0.0,
            stop_loss: 0.0,
            largest_win: 0.0,
            largest_loss: 0.0,
            average_win: 0.0,
            average_loss: 0.0,
            profit_factor: 0.0,
            sharpe_ratio: 0.0,
        }
    }
}

impl Default for MetricsSummary {
    fn default() -> Self {
        Self::new()
    }
}
