use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_source::error::SourceError;
use serde_json::json;
use thiserror::Error;

/// Every way `/api/trading-data` can fail. Clients only ever see the kind and
/// a fixed message; the cause stays in the server log.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("The data source returned no trades")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(AnalyticsError),
    #[error("Upstream error: {0}")]
    Upstream(#[from] SourceError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidCell(_) => AppError::Validation(err),
            // Only reachable when the strategy and the source disagree.
            AnalyticsError::MissingSummaryRow => AppError::Internal(err.to_string()),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Upstream(_) => "upstream",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            AppError::NotFound => "No data found",
            AppError::Validation(_) => "Trading data contains invalid values",
            AppError::Upstream(_) => "Failed to fetch trading data",
            AppError::Internal(_) => "An internal error occurred",
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::NotFound => tracing::warn!("No trading data found."),
            AppError::Validation(err) => tracing::error!(error = ?err, "Invalid trading data."),
            AppError::Upstream(err) => tracing::error!(error = ?err, "Data source error."),
            AppError::Internal(message) => tracing::error!(error = %message, "Internal error."),
        }

        let body = Json(json!({ "error": self.client_message(), "kind": self.kind() }));
        (self.status_code(), body).into_response()
    }
}
