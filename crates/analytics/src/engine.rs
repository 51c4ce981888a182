use crate::report::MetricsSummary;
use core_types::TradeRecord;

/// Trading days per year, used to annualize the per-trade Sharpe ratio.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A stateless calculator for deriving performance metrics from a trade set.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    default_stop_loss: f64,
}

impl MetricsEngine {
    /// Stop loss reported when the latest trade does not carry its own.
    pub const DEFAULT_STOP_LOSS: f64 = 2.5;

    pub fn new(default_stop_loss: f64) -> Self {
        Self { default_stop_loss }
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// `trades` must be ordered oldest-first; the last element is treated as
    /// the most recent snapshot and supplies `account_value` and `stop_loss`.
    pub fn calculate(&self, trades: &[TradeRecord]) -> MetricsSummary {
        let mut report = MetricsSummary::new();
        report.stop_loss = self.default_stop_loss;

        let Some(latest) = trades.last() else {
            // If there are no trades, every aggregate stays at zero.
            return report;
        };

        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_percentage).collect();

        Self::calculate_profitability(&returns, &mut report);
        Self::calculate_extremes(&returns, &mut report);
        report.sharpe_ratio = annualized_sharpe(&returns);

        report.account_value = latest.account_value.unwrap_or(0.0);
        if let Some(stop) = latest.trailing_stop.filter(|stop| *stop != 0.0) {
            report.stop_loss = stop;
        }

        report
    }

    /// Win rate, average win/loss and profit factor.
    ///
    /// Averages are accumulated as `x / n` so that large but finite returns
    /// cannot overflow the running sum.
    fn calculate_profitability(returns: &[f64], report: &mut MetricsSummary) {
        let winners: Vec<f64> = returns.iter().copied().filter(|pnl| *pnl > 0.0).collect();
        let losers: Vec<f64> = returns.iter().copied().filter(|pnl| *pnl < 0.0).collect();

        report.total_trades = returns.len() as u64;
        report.win_rate = 100.0 * winners.len() as f64 / returns.len() as f64;
        report.average_win = mean(&winners);
        report.average_loss = mean(&losers);

        report.profit_factor = match (winners.len(), losers.len()) {
            (0, _) => 0.0,
            (_, 0) => f64::INFINITY,
            (wins, losses) => {
                // Gross wins over gross losses, rearranged so neither gross sum is formed.
                let ratio = (report.average_win / report.average_loss.abs())
                    * (wins as f64 / losses as f64);
                if ratio.is_nan() { 0.0 } else { ratio }
            }
        };
    }

    /// Largest win and largest loss are the max and min over every trade,
    /// so a set with no losers reports its smallest win as `largest_loss`.
    fn calculate_extremes(returns: &[f64], report: &mut MetricsSummary) {
        report.largest_win = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        report.largest_loss = returns.iter().copied().fold(f64::INFINITY, f64::min);
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STOP_LOSS)
    }
}

/// Sharpe ratio of a return series with a zero risk-free rate, annualized by
/// `sqrt(252)` on the assumption of one trade per trading day.
///
/// Uses the population standard deviation. A flat series returns `0.0`.
pub fn annualized_sharpe(returns: &[f64]) -> f64 {
    let Some(&first) = returns.first() else {
        return 0.0;
    };
    if returns.iter().all(|r| *r == first) {
        return 0.0;
    }

    // The ratio is scale-free, so work on returns normalized into [-1, 1].
    let scale = returns.iter().fold(0.0f64, |max, r| max.max(r.abs()));
    let n = returns.len() as f64;
    let mean = returns.iter().map(|r| r / scale).sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r / scale - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }
    let sharpe = (mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt();
    if sharpe.is_finite() { sharpe } else { 0.0 }
}

/// Mean of `values`, or `0.0` when there are none.
fn mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    values.iter().map(|v| v / n).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trades(pnls: &[f64]) -> Vec<TradeRecord> {
        pnls.iter()
            .map(|&pnl| TradeRecord {
                pnl_percentage: pnl,
                ..Default::default()
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_trade_set_is_all_zero() {
        let report = MetricsEngine::default().calculate(&[]);

        assert_eq!(report.total_trades, 0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.average_win, 0.0);
        assert_eq!(report.average_loss, 0.0);
        assert_eq!(report.largest_win, 0.0);
        assert_eq!(report.largest_loss, 0.0);
        assert_eq!(report.profit_factor, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.account_value, 0.0);
        assert_eq!(report.stop_loss, MetricsEngine::DEFAULT_STOP_LOSS);
    }

    #[test]
    fn mixed_wins_and_losses() {
        let report = MetricsEngine::default().calculate(&trades(&[10.0, 5.0, -3.0, -2.0]));

        assert_eq!(report.total_trades, 4);
        assert_eq!(report.win_rate, 50.0);
        assert_eq!(report.average_win, 7.5);
        assert_eq!(report.average_loss, -2.5);
        assert_eq!(report.largest_win, 10.0);
        assert_eq!(report.largest_loss, -3.0);
        assert_eq!(report.profit_factor, 3.0);
    }

    #[test]
    fn all_winning_trades() {
        let report = MetricsEngine::default().calculate(&trades(&[1.0, 2.0]));

        assert_eq!(report.profit_factor, f64::INFINITY);
        assert_eq!(report.average_loss, 0.0);
        assert_eq!(report.win_rate, 100.0);
        // The minimum over all trades, not over losers only.
        assert_eq!(report.largest_loss, 1.0);
    }

    #[test]
    fn flat_trades_count_but_belong_to_no_bucket() {
        let report = MetricsEngine::default().calculate(&trades(&[0.0, 4.0, 0.0, -1.0]));

        assert_eq!(report.total_trades, 4);
        assert_eq!(report.win_rate, 25.0);
        assert_eq!(report.average_win, 4.0);
        assert_eq!(report.average_loss, -1.0);
        assert_eq!(report.profit_factor, 4.0);
    }

    #[test]
    fn all_zero_returns_have_zero_profit_factor() {
        let report = MetricsEngine::default().calculate(&trades(&[0.0, 0.0]));

        assert_eq!(report.profit_factor, 0.0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
    }

    #[test]
    fn constant_series_has_zero_sharpe() {
        assert_eq!(annualized_sharpe(&[0.1, 0.1, 0.1]), 0.0);
        assert_eq!(annualized_sharpe(&[2.0]), 0.0);
        assert_eq!(annualized_sharpe(&[]), 0.0);
    }

    #[test]
    fn sharpe_is_annualized_population_ratio() {
        // mean 1, population std 1
        let sharpe = annualized_sharpe(&[0.0, 2.0]);
        assert!(approx(sharpe, 252f64.sqrt()));

        // mean -1, population std 2
        let sharpe = annualized_sharpe(&[1.0, -3.0]);
        assert!(approx(sharpe, -0.5 * 252f64.sqrt()));
    }

    #[test]
    fn extreme_returns_stay_finite() {
        let report = MetricsEngine::default().calculate(&trades(&[1e308, 1.5e308]));

        assert_eq!(report.average_win, 1e308 / 2.0 + 1.5e308 / 2.0);
        assert_eq!(report.profit_factor, f64::INFINITY);
        assert!(approx(report.sharpe_ratio, 5.0 * 252f64.sqrt()));

        let report = MetricsEngine::default().calculate(&trades(&[1.7e308, -1.5e308, 1e308, -1e308]));
        assert!(report.average_win.is_finite());
        assert!(report.average_loss.is_finite());
        assert!(report.profit_factor.is_finite());
        assert!(report.sharpe_ratio.is_finite());

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn latest_trade_supplies_account_value_and_stop() {
        let mut set = trades(&[1.0, -1.0]);
        set[0].account_value = Some(1000.0);
        set[1].account_value = Some(990.0);
        set[1].trailing_stop = Some(1.75);

        let report = MetricsEngine::new(3.0).calculate(&set);

        assert_eq!(report.account_value, 990.0);
        assert_eq!(report.stop_loss, 1.75);
    }

    #[test]
    fn zero_or_missing_trailing_stop_falls_back_to_default() {
        let mut set = trades(&[1.0]);
        set[0].trailing_stop = Some(0.0);
        assert_eq!(MetricsEngine::new(3.0).calculate(&set).stop_loss, 3.0);

        set[0].trailing_stop = None;
        assert_eq!(MetricsEngine::new(3.0).calculate(&set).stop_loss, 3.0);
    }
}
