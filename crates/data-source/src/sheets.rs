use crate::error::SourceError;
use crate::http::{build_client, endpoint, get_json};
use crate::responses::ValueRange;
use crate::{RawData, TradeSource};
use async_trait::async_trait;
use configuration::GoogleSheetsSettings;
use reqwest::Url;
use std::time::Duration;

/// Reads a sheet range through the Sheets v4 `values.get` endpoint.
///
/// Values are requested unformatted so numeric cells arrive as JSON numbers,
/// while dates come back as their displayed strings.
#[derive(Clone)]
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl GoogleSheetsSource {
    pub fn new(settings: &GoogleSheetsSettings, timeout: Duration) -> Result<Self, SourceError> {
        let url = endpoint(
            &settings.base_url,
            &["v4", "spreadsheets", &settings.spreadsheet_id, "values", &settings.range],
        )?;
        Ok(Self {
            client: build_client(timeout)?,
            url,
            api_key: non_empty(&settings.api_key),
            access_token: non_empty(&settings.access_token),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[async_trait]
impl TradeSource for GoogleSheetsSource {
    fn name(&self) -> &'static str {
        "google_sheets"
    }

    async fn fetch(&self) -> Result<RawData, SourceError> {
        let mut request = self.client.get(self.url.clone()).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "UNFORMATTED_VALUE"),
            ("dateTimeRenderOption", "FORMATTED_STRING"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let range: ValueRange = get_json(request).await?;
        tracing::debug!(
            range = range.range.as_deref().unwrap_or_default(),
            major_dimension = range.major_dimension.as_deref().unwrap_or("ROWS"),
            rows = range.values.len(),
            "Fetched sheet values."
        );
        Ok(RawData::Table(range.values))
    }
}
