use serde::{Deserialize, Serialize};

/// One trading position snapshot, normalized from whatever shape the
/// upstream source delivers.
///
/// Field names serialize in camelCase to match the dashboard contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Source-dependent timestamp, passed through as delivered.
    pub timestamp: String,
    pub symbol: String,
    pub close_price: f64,
    /// Side or label of the position (e.g. "Long", "Short", "None").
    pub position: String,
    pub entry_price: f64,
    /// Signed profit or loss of the trade, in percent.
    pub pnl_percentage: f64,
    #[serde(rename = "cumulativeROI")]
    pub cumulative_roi: f64,
    /// Only reported by sources that track the account balance per record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_value: Option<f64>,
    /// Per-record stop distance, when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_stop: Option<f64>,
}
