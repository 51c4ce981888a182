use core_types::{Row, TradeRecord};
use serde::Deserialize;
use std::collections::HashMap;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The response from `GET /v4/spreadsheets/{id}/values/{range}`.
///
/// Google omits `values` entirely when the range is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Row>,
}

/// One page of `GET /v0/{base}/{table}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableListResponse {
    pub records: Vec<AirtableRecord>,
    /// Cursor for the next page; absent on the last one.
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableRecord {
    /// Airtable leaves empty fields out of the map.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

/// A single row of the record store's `trade_data` table.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRow {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub position_type: Option<String>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub pnl_percent: Option<f64>,
    #[serde(default)]
    pub cumulative_roi: Option<f64>,
    #[serde(default)]
    pub account_value: Option<f64>,
    #[serde(default)]
    pub trailing_stop: Option<f64>,
}

impl From<StoreRow> for TradeRecord {
    fn from(row: StoreRow) -> Self {
        TradeRecord {
            timestamp: row.timestamp,
            symbol: row.symbol,
            close_price: row.current_price.unwrap_or(0.0),
            position: row.position_type.unwrap_or_default(),
            entry_price: row.entry_price.unwrap_or(0.0),
            pnl_percentage: row.pnl_percent.unwrap_or(0.0),
            cumulative_roi: row.cumulative_roi.unwrap_or(0.0),
            account_value: row.account_value,
            trailing_stop: row.trailing_stop,
        }
    }
}
