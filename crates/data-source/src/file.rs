use crate::error::SourceError;
use crate::{RawData, TradeSource};
use async_trait::async_trait;
use core_types::Row;
use std::path::PathBuf;

/// A JSON file holding an array of rows, header first, in the same shape the
/// Sheets API returns. Re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TradeSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self) -> Result<RawData, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let rows: Vec<Row> = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Deserialization(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "Read rows from file.");
        Ok(RawData::Table(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Cell;
    use std::io::Write;

    #[tokio::test]
    async fn reads_rows_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["Timestamp","Symbol"],["2024-01-01","BTC", 1.5, null]]"#).unwrap();

        let RawData::Table(rows) = FileSource::new(file.path()).fetch().await.unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], Cell::Number(1.5));
        assert_eq!(rows[1][3], Cell::Empty);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = FileSource::new("/definitely/not/here.json").fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_a_deserialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = FileSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Deserialization(_)));
    }
}
