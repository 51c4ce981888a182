use crate::error::ConfigError;
use core_types::MetricsStrategy;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: SocketAddr,
    /// Allowed CORS origins. A single `"*"` allows any origin.
    #[serde(deserialize_with = "lenient::origins")]
    pub cors_origins: Vec<String>,
    /// Upper bound on a single upstream fetch.
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3001),
            cors_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ServerSettings {
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Controls how the metrics summary is derived.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub strategy: MetricsStrategy,
    /// Reported as `stopLoss` when the latest trade carries no stop of its own.
    pub default_stop_loss: f64,
    /// Rows shorter than this are not trades.
    pub min_row_len: usize,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            strategy: MetricsStrategy::Computed,
            default_stop_loss: 2.5,
            min_row_len: MIN_TRADE_COLUMNS,
        }
    }
}

/// A trade row needs at least this many columns.
const MIN_TRADE_COLUMNS: usize = 7;

/// The upstream data store, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSettings {
    GoogleSheets(GoogleSheetsSettings),
    Airtable(AirtableSettings),
    RecordStore(RecordStoreSettings),
    File(FileSourceSettings),
}

impl SourceSettings {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSettings::GoogleSheets(_) => "google_sheets",
            SourceSettings::Airtable(_) => "airtable",
            SourceSettings::RecordStore(_) => "record_store",
            SourceSettings::File(_) => "file",
        }
    }

    /// Whether the source delivers raw rows, which is what column
    /// extraction needs.
    pub fn is_tabular(&self) -> bool {
        !matches!(self, SourceSettings::RecordStore(_))
    }
}

/// Parameters for the Google Sheets `values.get` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSheetsSettings {
    pub spreadsheet_id: String,
    /// A1 notation range, e.g. "Sheet1!A:Z".
    #[serde(default = "default_sheet_range")]
    pub range: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// OAuth bearer token, used instead of or alongside the API key.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
}

/// Parameters for an Airtable table listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableSettings {
    pub base_id: String,
    #[serde(default = "default_airtable_table")]
    pub table: String,
    pub api_key: String,
    #[serde(default = "default_max_records", deserialize_with = "lenient::count")]
    pub max_records: usize,
    #[serde(default = "default_airtable_base_url")]
    pub base_url: String,
}

/// Parameters for a PostgREST record store (e.g. Supabase).
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStoreSettings {
    /// Project URL; `/rest/v1/<table>` is appended.
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_record_table")]
    pub table: String,
    #[serde(default = "default_max_records", deserialize_with = "lenient::count")]
    pub limit: usize,
}

/// A local JSON document holding an array of rows.
#[derive(Debug, Clone, Deserialize)]
pub struct FileSourceSettings {
    pub path: PathBuf,
}

/// Log output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_sheet_range() -> String {
    "Sheet1!A:Z".to_string()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_airtable_table() -> String {
    "Trading Bot".to_string()
}

fn default_airtable_base_url() -> String {
    "https://api.airtable.com".to_string()
}

fn default_record_table() -> String {
    "trade_data".to_string()
}

fn default_max_records() -> usize {
    100
}

/// Environment overrides arrive as strings. Inside the `kind`-tagged source
/// table serde buffers values before the field types are known, so numbers
/// and lists have to accept their string spelling explicitly.
mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let value = match Count::deserialize(deserializer)? {
            Count::Number(n) => n,
            Count::Text(text) => text.trim().parse().map_err(|_| {
                D::Error::custom(format!("expected a non-negative integer, got {text:?}"))
            })?,
        };
        usize::try_from(value).map_err(D::Error::custom)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        List(Vec<String>),
        Csv(String),
    }

    /// A list, or a comma-separated string such as `"http://a,http://b"`.
    pub fn origins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Origins::deserialize(deserializer)? {
            Origins::List(list) => list,
            Origins::Csv(text) => text
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl Config {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(invalid("server.request_timeout_secs must be greater than 0"));
        }
        if self.server.cors_origins.is_empty() {
            return Err(invalid("server.cors_origins must list at least one origin or \"*\""));
        }
        if !self.metrics.default_stop_loss.is_finite() || self.metrics.default_stop_loss < 0.0 {
            return Err(invalid("metrics.default_stop_loss must be a non-negative number"));
        }
        if self.metrics.min_row_len < MIN_TRADE_COLUMNS {
            return Err(invalid(format!(
                "metrics.min_row_len must be at least {MIN_TRADE_COLUMNS}"
            )));
        }
        if self.metrics.strategy == MetricsStrategy::Extracted && !self.source.is_tabular() {
            return Err(invalid(format!(
                "the extracted metrics strategy needs a tabular source, but source.kind is {}",
                self.source.kind()
            )));
        }

        match &self.source {
            SourceSettings::GoogleSheets(sheets) => {
                require("source.spreadsheet_id", &sheets.spreadsheet_id)?;
                let has_key = sheets.api_key.as_deref().is_some_and(|k| !k.is_empty());
                let has_token = sheets.access_token.as_deref().is_some_and(|t| !t.is_empty());
                if !has_key && !has_token {
                    return Err(invalid(
                        "a google_sheets source needs source.api_key or source.access_token",
                    ));
                }
            }
            SourceSettings::Airtable(airtable) => {
                require("source.base_id", &airtable.base_id)?;
                require("source.api_key", &airtable.api_key)?;
                require("source.table", &airtable.table)?;
                if airtable.max_records == 0 {
                    return Err(invalid("source.max_records must be greater than 0"));
                }
            }
            SourceSettings::RecordStore(store) => {
                require("source.url", &store.url)?;
                require("source.api_key", &store.api_key)?;
                require("source.table", &store.table)?;
                if store.limit == 0 {
                    return Err(invalid("source.limit must be greater than 0"));
                }
            }
            SourceSettings::File(file) => {
                if file.path.as_os_str().is_empty() {
                    return Err(invalid("source.path must not be empty"));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(())
}
