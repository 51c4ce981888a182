use crate::error::AnalyticsError;
use crate::report::MetricsSummary;
use core_types::RowView;

// Trailing summary columns carried by the last row of a tabular source.
const WIN_RATE: usize = 7;
const TOTAL_TRADES: usize = 8;
const ACCOUNT_VALUE: usize = 9;
const STOP_LOSS: usize = 10;
const LARGEST_WIN: usize = 11;
const LARGEST_LOSS: usize = 12;
const AVERAGE_WIN: usize = 13;
const AVERAGE_LOSS: usize = 14;
const PROFIT_FACTOR: usize = 15;
const SHARPE_RATIO: usize = 16;

/// Reads a precomputed `MetricsSummary` out of the trailing columns of a
/// summary row, without looking at the trade set at all.
///
/// Columns past the end of the row read as zero.
pub fn extract_summary(row: RowView<'_>) -> Result<MetricsSummary, AnalyticsError> {
    Ok(MetricsSummary {
        win_rate: row.number(WIN_RATE)?,
        total_trades: row.count(TOTAL_TRADES)?,
        account_value: row.number(ACCOUNT_VALUE)?,
        stop_loss: row.number(STOP_LOSS)?,
        largest_win: row.number(LARGEST_WIN)?,
        largest_loss: row.number(LARGEST_LOSS)?,
        average_win: row.number(AVERAGE_WIN)?,
        average_loss: row.number(AVERAGE_LOSS)?,
        profit_factor: row.ratio(PROFIT_FACTOR)?,
        sharpe_ratio: row.number(SHARPE_RATIO)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Cell, CoreError, Row};
    use pretty_assertions::assert_eq;

    fn trade_cells() -> Row {
        vec![
            "2024-01-05".into(),
            "SOL".into(),
            "101".into(),
            "Long".into(),
            "100".into(),
            "1.0".into(),
            "6.2".into(),
        ]
    }

    #[test]
    fn reads_all_ten_trailing_columns() {
        let mut cells = trade_cells();
        cells.extend([
            Cell::Number(62.5),
            Cell::Number(8.0),
            Cell::Number(15.32),
            Cell::Number(2.5),
            Cell::Number(4.1),
            Cell::Number(-2.2),
            Cell::Number(1.9),
            Cell::Number(-1.1),
            "2.47".into(),
            Cell::Number(1.85),
        ]);

        let summary = extract_summary(RowView::new(8, &cells)).unwrap();

        assert_eq!(
            summary,
            MetricsSummary {
                win_rate: 62.5,
                total_trades: 8,
                account_value: 15.32,
                stop_loss: 2.5,
                largest_win: 4.1,
                largest_loss: -2.2,
                average_win: 1.9,
                average_loss: -1.1,
                profit_factor: 2.47,
                sharpe_ratio: 1.85,
            }
        );
    }

    #[test]
    fn row_without_trailing_columns_is_all_zero() {
        let cells = trade_cells();
        let summary = extract_summary(RowView::new(1, &cells)).unwrap();
        assert_eq!(summary, MetricsSummary::new());
    }

    #[test]
    fn partially_filled_row_zeroes_the_missing_tail() {
        let mut cells = trade_cells();
        cells.extend([Cell::Number(50.0), Cell::Number(4.0), Cell::Number(14.58)]);

        let summary = extract_summary(RowView::new(1, &cells)).unwrap();

        assert_eq!(summary.win_rate, 50.0);
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.account_value, 14.58);
        assert_eq!(summary.stop_loss, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
    }

    #[test]
    fn infinite_profit_factor_is_accepted() {
        let mut cells = trade_cells();
        cells.resize(PROFIT_FACTOR, Cell::Empty);
        cells.push("Infinity".into());

        let summary = extract_summary(RowView::new(1, &cells)).unwrap();
        assert_eq!(summary.profit_factor, f64::INFINITY);
    }

    #[test]
    fn garbage_in_a_summary_column_is_an_error() {
        let mut cells = trade_cells();
        cells.push("sixty".into());

        let err = extract_summary(RowView::new(4, &cells)).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidCell(CoreError::InvalidNumber {
                row: 4,
                column: WIN_RATE,
                value: "sixty".into(),
            })
        );
    }

    #[test]
    fn fractional_total_trades_is_an_error() {
        let mut cells = trade_cells();
        cells.extend([Cell::Number(50.0), Cell::Number(4.5)]);

        let err = extract_summary(RowView::new(2, &cells)).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidCell(CoreError::InvalidCount { column: TOTAL_TRADES, .. })
        ));
    }
}
