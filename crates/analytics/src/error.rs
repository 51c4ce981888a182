use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Malformed trade data: {0}")]
    InvalidCell(#[from] CoreError),

    #[error("Column extraction needs a trailing summary row, but the source delivered structured records")]
    MissingSummaryRow,
}
