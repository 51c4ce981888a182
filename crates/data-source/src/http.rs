use crate::error::SourceError;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Upstream error bodies are cut to this many characters before they are
/// carried in a `SourceError`.
const MAX_ERROR_BODY: usize = 512;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Parses `base` and appends `segments` to its path, percent-encoding each
/// segment (sheet ranges and table names may contain spaces).
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, SourceError> {
    let mut url = Url::parse(base)
        .map_err(|e| SourceError::Config(format!("invalid base url '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| SourceError::Config(format!("base url '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends the request and deserializes a successful JSON body.
/// Any non-2xx status becomes `SourceError::Status`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        serde_json::from_str::<T>(&text).map_err(|e| SourceError::Deserialization(e.to_string()))
    } else {
        Err(SourceError::Status {
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY).collect(),
        })
    }
}
