use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The upstream API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to deserialize the upstream response: {0}")]
    Deserialization(String),

    #[error("Failed to read the data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data source configuration: {0}")]
    Config(String),
}
