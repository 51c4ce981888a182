use thiserror::Error;

/// Errors raised while layering the TOML file and environment into a `Config`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration from file or environment: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing required setting: {field}")]
    MissingField { field: &'static str },
}
