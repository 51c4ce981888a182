use crate::error::SourceError;
use crate::http::{build_client, endpoint, get_json};
use crate::responses::StoreRow;
use crate::{RawData, TradeSource};
use async_trait::async_trait;
use configuration::RecordStoreSettings;
use core_types::TradeRecord;
use reqwest::Url;
use std::time::Duration;

/// Reads already-typed trade rows from a PostgREST endpoint
/// (`{url}/rest/v1/{table}`), as exposed by Supabase.
#[derive(Clone)]
pub struct RecordStoreSource {
    client: reqwest::Client,
    url: Url,
    api_key: String,
    limit: usize,
}

impl RecordStoreSource {
    pub fn new(settings: &RecordStoreSettings, timeout: Duration) -> Result<Self, SourceError> {
        let url = endpoint(&settings.url, &["rest", "v1", &settings.table])?;
        Ok(Self {
            client: build_client(timeout)?,
            url,
            api_key: settings.api_key.clone(),
            limit: settings.limit,
        })
    }
}

#[async_trait]
impl TradeSource for RecordStoreSource {
    fn name(&self) -> &'static str {
        "record_store"
    }

    async fn fetch(&self) -> Result<RawData, SourceError> {
        let request = self
            .client
            .get(self.url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*".to_string()),
                ("order", "timestamp.desc".to_string()),
                ("limit", self.limit.to_string()),
            ]);

        let rows: Vec<StoreRow> = get_json(request).await?;
        tracing::debug!(rows = rows.len(), "Fetched record store rows.");

        // Newest-first on the wire; everything downstream wants oldest-first.
        let mut trades: Vec<TradeRecord> = rows.into_iter().map(TradeRecord::from).collect();
        trades.reverse();
        Ok(RawData::Records(trades))
    }
}
