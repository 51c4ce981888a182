use crate::error::SourceError;
use async_trait::async_trait;
use configuration::SourceSettings;
use core_types::{Row, TradeRecord};
use std::time::Duration;

mod http;
pub mod airtable;
pub mod error;
pub mod file;
pub mod record_store;
pub mod responses;
pub mod sheets;

// --- Public API ---
pub use airtable::AirtableSource;
pub use file::FileSource;
pub use record_store::RecordStoreSource;
pub use sheets::GoogleSheetsSource;

/// What a source hands back: either raw rows that still need parsing, or
/// records that were already typed upstream. Both are ordered oldest-first.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Header row followed by data rows.
    Table(Vec<Row>),
    Records(Vec<TradeRecord>),
}

impl RawData {
    pub fn is_empty(&self) -> bool {
        match self {
            RawData::Table(rows) => rows.is_empty(),
            RawData::Records(records) => records.is_empty(),
        }
    }
}

/// The abstract interface for wherever the trading bot writes its log.
/// The web server only ever talks to this trait, so tests can swap in a stub.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// A short identifier for logs, e.g. "google_sheets".
    fn name(&self) -> &'static str;

    /// Fetches the current contents of the store.
    async fn fetch(&self) -> Result<RawData, SourceError>;
}

/// Constructs the source described by the configuration. `timeout` bounds
/// each upstream HTTP request.
pub fn build_source(
    settings: &SourceSettings,
    timeout: Duration,
) -> Result<Box<dyn TradeSource>, SourceError> {
    let source: Box<dyn TradeSource> = match settings {
        SourceSettings::GoogleSheets(sheets) => Box::new(GoogleSheetsSource::new(sheets, timeout)?),
        SourceSettings::Airtable(airtable) => Box::new(AirtableSource::new(airtable, timeout)?),
        SourceSettings::RecordStore(store) => Box::new(RecordStoreSource::new(store, timeout)?),
        SourceSettings::File(file) => Box::new(FileSource::new(&file.path)),
    };
    tracing::info!(source = source.name(), "Data source initialized.");
    Ok(source)
}
