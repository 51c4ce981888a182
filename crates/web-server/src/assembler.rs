use crate::error::AppError;
use analytics::{MetricsEngine, MetricsSummary, RowParser, Summarizer, TradeSet};
use configuration::settings::Config;
use core_types::TradeRecord;
use data_source::{build_source, error::SourceError, RawData, TradeSource};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The `/api/trading-data` payload. Trades and metrics always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingData {
    pub trades: Vec<TradeRecord>,
    pub metrics: MetricsSummary,
}

/// Runs fetch, parse and summarize for one request. Holds no per-request
/// state, so a single instance serves every request concurrently.
pub struct ResponseAssembler {
    source: Box<dyn TradeSource>,
    parser: RowParser,
    summarizer: Summarizer,
}

impl ResponseAssembler {
    pub fn new(source: Box<dyn TradeSource>, parser: RowParser, summarizer: Summarizer) -> Self {
        Self {
            source,
            parser,
            summarizer,
        }
    }

    /// Wires up the configured source, parser and metrics strategy.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);
        let source = build_source(&config.source, timeout)?;
        let metrics = &config.metrics;

        Ok(Self::new(
            source,
            RowParser::new(metrics.min_row_len),
            Summarizer::new(metrics.strategy, MetricsEngine::new(metrics.default_stop_loss)),
        ))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Produces the full payload, or the single error that stopped it.
    pub async fn assemble(&self) -> Result<TradingData, AppError> {
        let raw = self.source.fetch().await?;
        if raw.is_empty() {
            return Err(AppError::NotFound);
        }

        let set = match raw {
            RawData::Table(rows) => TradeSet::from_rows(rows, &self.parser)?,
            RawData::Records(records) => TradeSet::from_records(records),
        };
        if set.is_empty() {
            return Err(AppError::NotFound);
        }

        let metrics = self.summarizer.summarize(&set)?;
        tracing::info!(
            source = self.source.name(),
            trades = set.len(),
            strategy = %self.summarizer.strategy(),
            "Assembled trading data."
        );

        Ok(TradingData {
            trades: set.into_trades(),
            metrics,
        })
    }
}
