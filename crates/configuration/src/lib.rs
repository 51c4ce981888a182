use crate::error::ConfigError;
use crate::settings::Config;
use std::net::SocketAddr;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AirtableSettings, FileSourceSettings, GoogleSheetsSettings, LoggingSettings, MetricsSettings,
    RecordStoreSettings, ServerSettings, SourceSettings,
};

/// Prefix for environment variable overrides, e.g. `TRADESCOPE__SOURCE__API_KEY`.
pub const ENV_PREFIX: &str = "TRADESCOPE";

/// Loads the application configuration.
///
/// Values come from the TOML file at `path` (optional, missing is fine),
/// then from `TRADESCOPE__*` environment variables. The result is
/// validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_layers(path, environment(ENV_PREFIX))
}

/// Maps `PREFIX__SECTION__KEY` onto `section.key`. Values stay strings; the
/// settings types coerce them.
fn environment(prefix: &str) -> config::Environment {
    config::Environment::with_prefix(prefix)
        .prefix_separator("__")
        .separator("__")
}

fn load_layers(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(env)
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        source = config.source.kind(),
        strategy = %config.metrics.strategy,
        "Configuration loaded."
    );
    Ok(config)
}

/// Parses a configuration from a TOML string, without environment overrides.
pub fn from_toml_str(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Address to bind the HTTP server to (e.g. 127.0.0.1:8080).
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub bind: Option<SocketAddr>,

    /// Log level or filter directive (e.g. "debug", "web_server=trace").
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub json_logs: bool,
}

impl Config {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind_address = bind;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.json_logs {
            self.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::MetricsStrategy;
    use std::io::Write;

    const SHEETS: &str = r#"
        [source]
        kind = "google_sheets"
        spreadsheet_id = "sheet-123"
        api_key = "key"
    "#;

    #[test]
    fn minimal_config_fills_in_defaults() {
        let config = from_toml_str(SHEETS).unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:3001".parse::<SocketAddr>().unwrap());
        assert!(config.server.allows_any_origin());
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.metrics.strategy, MetricsStrategy::Computed);
        assert_eq!(config.metrics.default_stop_loss, 2.5);
        assert_eq!(config.metrics.min_row_len, 7);
        assert_eq!(config.logging.level, "info");

        let SourceSettings::GoogleSheets(sheets) = &config.source else {
            panic!("expected a google_sheets source");
        };
        assert_eq!(sheets.range, "Sheet1!A:Z");
        assert_eq!(sheets.base_url, "https://sheets.googleapis.com");
    }

    #[test]
    fn parses_every_section() {
        let config = from_toml_str(
            r#"
            [server]
            bind_address = "127.0.0.1:8080"
            cors_origins = ["http://localhost:3000"]
            request_timeout_secs = 5

            [metrics]
            strategy = "extracted"
            default_stop_loss = 1.5

            [source]
            kind = "airtable"
            base_id = "app123"
            api_key = "pat"

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert!(!config.server.allows_any_origin());
        assert_eq!(config.metrics.strategy, MetricsStrategy::Extracted);
        assert!(config.logging.json);
        let SourceSettings::Airtable(airtable) = &config.source else {
            panic!("expected an airtable source");
        };
        assert_eq!(airtable.table, "Trading Bot");
        assert_eq!(airtable.max_records, 100);
    }

    #[test]
    fn extraction_from_a_record_store_is_rejected() {
        let err = from_toml_str(
            r#"
            [metrics]
            strategy = "extracted"

            [source]
            kind = "record_store"
            url = "https://project.supabase.co"
            api_key = "anon"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("record_store")));
    }

    #[test]
    fn sheets_without_credentials_is_rejected() {
        let err = from_toml_str(
            r#"
            [source]
            kind = "google_sheets"
            spreadsheet_id = "sheet-123"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn blank_required_field_is_reported_by_name() {
        let err = from_toml_str(
            r#"
            [source]
            kind = "airtable"
            base_id = "  "
            api_key = "pat"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "source.base_id" }));
    }

    #[test]
    fn negative_stop_loss_is_rejected() {
        let toml = format!("{SHEETS}\n[metrics]\ndefault_stop_loss = -1.0\n");
        assert!(matches!(from_toml_str(&toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_source_is_a_load_error() {
        assert!(matches!(from_toml_str(""), Err(ConfigError::LoadError(_))));
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env_vars(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (format!("{ENV_PREFIX}__{key}"), value.to_string()))
            .collect::<config::Map<String, String>>();
        environment(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn loads_file_and_applies_environment_overrides() {
        let file = config_file(SHEETS);
        let env = env_vars(&[
            ("SOURCE__RANGE", "Trades!A:Q"),
            ("SERVER__CORS_ORIGINS", "http://a.test, http://b.test"),
            ("SERVER__REQUEST_TIMEOUT_SECS", "5"),
            ("LOGGING__JSON", "true"),
        ]);

        let config = load_layers(file.path(), env).unwrap();

        let SourceSettings::GoogleSheets(sheets) = &config.source else {
            panic!("expected a google_sheets source");
        };
        assert_eq!(sheets.range, "Trades!A:Q");
        assert_eq!(config.server.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.server.request_timeout_secs, 5);
        assert!(config.logging.json);
    }

    #[test]
    fn digit_only_overrides_stay_strings() {
        let file = config_file(
            r#"
            [source]
            kind = "google_sheets"
            spreadsheet_id = "abc"
            "#,
        );
        let env = env_vars(&[("SOURCE__API_KEY", "123456"), ("SOURCE__SPREADSHEET_ID", "987654321")]);

        let config = load_layers(file.path(), env).unwrap();

        let SourceSettings::GoogleSheets(sheets) = &config.source else {
            panic!("expected a google_sheets source");
        };
        assert_eq!(sheets.api_key.as_deref(), Some("123456"));
        assert_eq!(sheets.spreadsheet_id, "987654321");
    }

    #[test]
    fn numeric_source_overrides_are_parsed_from_strings() {
        let file = config_file(
            r#"
            [source]
            kind = "airtable"
            base_id = "app123"
            api_key = "pat"
            max_records = 20
            "#,
        );
        assert!(matches!(
            load_layers(file.path(), env_vars(&[])).unwrap().source,
            SourceSettings::Airtable(AirtableSettings { max_records: 20, .. })
        ));

        let env = env_vars(&[("SOURCE__MAX_RECORDS", "250"), ("SOURCE__BASE_ID", "42")]);
        let config = load_layers(file.path(), env).unwrap();
        let SourceSettings::Airtable(airtable) = &config.source else {
            panic!("expected an airtable source");
        };
        assert_eq!(airtable.max_records, 250);
        assert_eq!(airtable.base_id, "42");

        let env = env_vars(&[("SOURCE__MAX_RECORDS", "many")]);
        assert!(matches!(load_layers(file.path(), env), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut config = from_toml_str(SHEETS).unwrap();
        config.apply(&Overrides {
            bind: Some("127.0.0.1:9000".parse().unwrap()),
            log_level: Some("trace".into()),
            json_logs: true,
        });

        assert_eq!(config.server.bind_address.port(), 9000);
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json);
    }
}
