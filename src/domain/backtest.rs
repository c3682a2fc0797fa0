//! Single-instrument backtest engine.
//!
//! Bars are replayed in order; signals fill at the same bar's close with a
//! proportional commission. Each ticker is simulated against its own cash
//! account, so one bad instrument cannot distort another's metrics.

use chrono::NaiveDate;

use super::bar::closes;
use super::error::ScreenerError;
use super::indicator::{rolling_high, sma, ROLLING_HIGH_PERIOD, SMA_PERIOD};
use super::metrics::{compute_cagr_pct, compute_max_drawdown_pct, compute_sharpe, BacktestResult};
use super::stock_record::StockRecord;
use super::strategy::{Signal, StrategyParams, TrendFollower};
use crate::ports::log_port::ErrorLogPort;

/// Bars required for a meaningful simulation (one trading year).
pub const MIN_BACKTEST_BARS: usize = 252;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub commission_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 100_000.0,
            commission_rate: 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub shares: u64,
    pub price: f64,
    pub commission: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub ticker: String,
    pub result: BacktestResult,
    pub equity_curve: Vec<f64>,
    pub trades: Vec<Trade>,
}

pub fn run_backtest(
    record: &StockRecord,
    params: &StrategyParams,
    config: &BacktestConfig,
) -> Result<BacktestRun, ScreenerError> {
    let bars = &record.hist;
    if bars.len() < MIN_BACKTEST_BARS {
        return Err(ScreenerError::InsufficientHistory {
            ticker: record.ticker.clone(),
            bars: bars.len(),
            minimum: MIN_BACKTEST_BARS,
        });
    }

    let close_series = closes(bars);
    let sma_series = sma(&close_series, SMA_PERIOD);
    let high_series = rolling_high(&close_series, ROLLING_HIGH_PERIOD);

    let mut follower = TrendFollower::new(*params);
    let mut cash = config.initial_cash;
    let mut shares: u64 = 0;
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut trades = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        match follower.evaluate(bar.close, sma_series[i], high_series[i]) {
            Signal::Enter => {
                let order = params.sizing.shares(cash, bar.close);
                let cost = order as f64 * bar.close;
                let commission = cost * config.commission_rate;
                if order > 0 && cost + commission <= cash {
                    cash -= cost + commission;
                    shares = order;
                    follower.enter(bar.close);
                    trades.push(Trade {
                        date: bar.date,
                        side: TradeSide::Buy,
                        shares: order,
                        price: bar.close,
                        commission,
                    });
                }
            }
            Signal::Exit => {
                let proceeds = shares as f64 * bar.close;
                let commission = proceeds * config.commission_rate;
                cash += proceeds - commission;
                trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Sell,
                    shares,
                    price: bar.close,
                    commission,
                });
                shares = 0;
                follower.exit();
            }
            Signal::Hold => {}
        }

        equity_curve.push(cash + shares as f64 * bar.close);
    }

    let final_equity = *equity_curve.last().unwrap_or(&config.initial_cash);
    let result = BacktestResult {
        cagr_pct: compute_cagr_pct(&equity_curve),
        sharpe: compute_sharpe(&equity_curve),
        max_drawdown_pct: compute_max_drawdown_pct(&equity_curve),
        trade_count: trades.len(),
        final_equity,
    };

    Ok(BacktestRun {
        ticker: record.ticker.clone(),
        result,
        equity_curve,
        trades,
    })
}

/// Backtest each record independently. Failures are logged against their
/// ticker and skipped so the rest of the batch still completes.
pub fn run_batch(
    records: &[StockRecord],
    params: &StrategyParams,
    config: &BacktestConfig,
    log: &dyn ErrorLogPort,
    mut progress: impl FnMut(usize, usize, &str),
) -> Vec<BacktestRun> {
    let total = records.len();
    let mut runs = Vec::new();

    for (i, record) in records.iter().enumerate() {
        progress(i + 1, total, &record.ticker);
        match run_backtest(record, params, config) {
            Ok(run) => runs.push(run),
            Err(err) => log.log(&record.ticker, &err.to_string()),
        }
    }

    runs
}
