use crate::engine::MetricsEngine;
use crate::error::AnalyticsError;
use crate::extractor::extract_summary;
use crate::parser::RowParser;
use crate::report::MetricsSummary;
use core_types::{MetricsStrategy, Row, RowView, TradeRecord};

/// Normalized trades plus, for tabular sources, the last raw row that may
/// carry precomputed summary columns.
#[derive(Debug, Clone, Default)]
pub struct TradeSet {
    trades: Vec<TradeRecord>,
    summary_row: Option<(usize, Row)>,
}

impl TradeSet {
    /// Parses a tabular snapshot, keeping its final row for column extraction.
    pub fn from_rows(mut rows: Vec<Row>, parser: &RowParser) -> Result<Self, AnalyticsError> {
        let trades = parser.parse(&rows)?;
        let summary_row = rows.pop().map(|row| (rows.len(), row));
        Ok(Self {
            trades,
            summary_row,
        })
    }

    /// Wraps trades that a record-store source has already structured.
    pub fn from_records(trades: Vec<TradeRecord>) -> Self {
        Self {
            trades,
            summary_row: None,
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn summary_row(&self) -> Option<RowView<'_>> {
        self.summary_row
            .as_ref()
            .map(|(index, cells)| RowView::new(*index, cells))
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }
}

/// Derives a `MetricsSummary` from a `TradeSet` using the configured
/// `MetricsStrategy`.
#[derive(Debug, Clone)]
pub struct Summarizer {
    strategy: MetricsStrategy,
    engine: MetricsEngine,
}

impl Summarizer {
    pub fn new(strategy: MetricsStrategy, engine: MetricsEngine) -> Self {
        Self { strategy, engine }
    }

    pub fn strategy(&self) -> MetricsStrategy {
        self.strategy
    }

    pub fn summarize(&self, set: &TradeSet) -> Result<MetricsSummary, AnalyticsError> {
        match self.strategy {
            MetricsStrategy::Computed => Ok(self.engine.calculate(set.trades())),
            MetricsStrategy::Extracted => {
                let row = set.summary_row().ok_or(AnalyticsError::MissingSummaryRow)?;
                extract_summary(row)
            }
        }
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(MetricsStrategy::default(), MetricsEngine::default())
    }
}
