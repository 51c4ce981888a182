use crate::error::SourceError;
use crate::http::{build_client, endpoint, get_json};
use crate::responses::{AirtableListResponse, AirtableRecord};
use crate::{RawData, TradeSource};
use async_trait::async_trait;
use configuration::AirtableSettings;
use core_types::{Cell, Row};
use reqwest::Url;
use std::time::Duration;

/// Airtable field names, in the column order the row parser and the summary
/// extractor expect.
pub const FIELD_COLUMNS: [&str; 17] = [
    "Timestamp",
    "Symbol",
    "Close Price",
    "Position",
    "Entry Price",
    "PNL Percentage",
    "Cumulative ROI",
    "Win Rate",
    "Total Trades",
    "Account Value",
    "Stop Loss",
    "Largest Win",
    "Largest Loss",
    "Average Win",
    "Average Loss",
    "Profit Factor",
    "Sharpe Ratio",
];

/// Airtable never returns more than this many records per page.
const MAX_PAGE_SIZE: usize = 100;

/// Lists a table newest-first and projects each record onto `FIELD_COLUMNS`,
/// producing the same header-plus-rows shape a spreadsheet would.
#[derive(Clone)]
pub struct AirtableSource {
    client: reqwest::Client,
    url: Url,
    api_key: String,
    max_records: usize,
}

impl AirtableSource {
    pub fn new(settings: &AirtableSettings, timeout: Duration) -> Result<Self, SourceError> {
        let url = endpoint(&settings.base_url, &["v0", &settings.base_id, &settings.table])?;
        Ok(Self {
            client: build_client(timeout)?,
            url,
            api_key: settings.api_key.clone(),
            max_records: settings.max_records,
        })
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<AirtableListResponse, SourceError> {
        let mut params: Vec<(&str, String)> = vec![
            ("maxRecords", self.max_records.to_string()),
            ("pageSize", self.max_records.min(MAX_PAGE_SIZE).to_string()),
            ("sort[0][field]", "Timestamp".to_string()),
            ("sort[0][direction]", "desc".to_string()),
            ("filterByFormula", "NOT({Timestamp} = \"\")".to_string()),
        ];
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }

        let request = self
            .client
            .get(self.url.clone())
            .bearer_auth(&self.api_key)
            .query(&params);
        get_json(request).await
    }
}

#[async_trait]
impl TradeSource for AirtableSource {
    fn name(&self) -> &'static str {
        "airtable"
    }

    async fn fetch(&self) -> Result<RawData, SourceError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(offset.as_deref()).await?;
            pages += 1;
            records.extend(page.records);

            match page.offset {
                Some(next) if records.len() < self.max_records => offset = Some(next),
                _ => break,
            }
        }
        records.truncate(self.max_records);

        tracing::debug!(records = records.len(), pages, "Fetched Airtable records.");
        Ok(RawData::Table(records_to_rows(records)))
    }
}

/// Builds a header row followed by one row per record, oldest first.
pub fn records_to_rows(records: Vec<AirtableRecord>) -> Vec<Row> {
    if records.is_empty() {
        return Vec::new();
    }

    let header: Row = FIELD_COLUMNS.iter().map(|name| Cell::from(*name)).collect();
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(header);
    // Records arrive newest-first.
    rows.extend(records.into_iter().rev().map(record_to_row));
    rows
}

fn record_to_row(mut record: AirtableRecord) -> Row {
    FIELD_COLUMNS
        .iter()
        .map(|name| record.fields.remove(*name).map(cell_from_json).unwrap_or(Cell::Empty))
        .collect()
}

fn cell_from_json(value: serde_json::Value) -> Cell {
    use serde_json::Value;
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        Value::String(s) => Cell::Text(s),
        // Lookups and linked records; the parser will reject them if used.
        other => Cell::Text(other.to_string()),
    }
}
