use crate::error::AnalyticsError;
use core_types::{CoreError, Row, RowView, TradeRecord};

// Column positions of the trade fields in a tabular source.
const TIMESTAMP: usize = 0;
const SYMBOL: usize = 1;
const CLOSE_PRICE: usize = 2;
const POSITION: usize = 3;
const ENTRY_PRICE: usize = 4;
const PNL_PERCENTAGE: usize = 5;
const CUMULATIVE_ROI: usize = 6;
// Optional per-row snapshot columns, present on wide sheets.
const ACCOUNT_VALUE: usize = 9;
const STOP_LOSS: usize = 10;

/// Converts loosely-typed tabular rows into `TradeRecord`s.
///
/// The first row is a header and is always skipped. Rows shorter than the
/// minimum length are dropped without error. Blank numeric cells read as
/// `0.0`, while numeric cells holding garbage fail the whole parse.
#[derive(Debug, Clone, Copy)]
pub struct RowParser {
    min_row_len: usize,
}

impl RowParser {
    /// The number of columns a row needs before it is considered a trade.
    pub const DEFAULT_MIN_ROW_LEN: usize = CUMULATIVE_ROI + 1;

    pub fn new(min_row_len: usize) -> Self {
        Self { min_row_len }
    }

    /// Parses every data row, preserving source order.
    pub fn parse(&self, rows: &[Row]) -> Result<Vec<TradeRecord>, AnalyticsError> {
        let mut trades = Vec::with_capacity(rows.len().saturating_sub(1));
        let mut skipped = 0usize;

        for (index, cells) in rows.iter().enumerate().skip(1) {
            let row = RowView::new(index, cells);
            if row.len() < self.min_row_len {
                skipped += 1;
                continue;
            }
            trades.push(Self::parse_row(&row)?);
        }

        if skipped > 0 {
            tracing::debug!(skipped, min_row_len = self.min_row_len, "Dropped short rows.");
        }
        Ok(trades)
    }

    fn parse_row(row: &RowView<'_>) -> Result<TradeRecord, CoreError> {
        Ok(TradeRecord {
            timestamp: row.text(TIMESTAMP),
            symbol: row.text(SYMBOL),
            close_price: row.number(CLOSE_PRICE)?,
            position: row.text(POSITION),
            entry_price: row.number(ENTRY_PRICE)?,
            pnl_percentage: row.number(PNL_PERCENTAGE)?,
            cumulative_roi: row.number(CUMULATIVE_ROI)?,
            account_value: row.optional_number(ACCOUNT_VALUE)?,
            trailing_stop: row.optional_number(STOP_LOSS)?,
        })
    }
}

impl Default for RowParser {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_ROW_LEN)
    }
}
