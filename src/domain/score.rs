//! CAN SLIM composite scoring.
//!
//! Fundamentals and technicals each contribute up to 80 points. Unknown
//! fundamentals and undefined indicator values simply earn nothing; scoring
//! never fails on a well-formed record.

use super::indicator::{macd_default, rsi, sma, RSI_PERIOD, SMA_PERIOD};
use super::stock_record::StockRecord;

/// Bars required before any score is awarded (SMA(200) must be defined).
pub const MIN_SCORE_BARS: usize = 200;

/// Technical score at or above this counts as positive momentum.
pub const MOMENTUM_THRESHOLD: i32 = 40;

const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub total: i32,
    pub fundamental: i32,
    pub technical: i32,
}

impl ScoreResult {
    pub fn zero() -> Self {
        ScoreResult {
            total: 0,
            fundamental: 0,
            technical: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MomentumFilter {
    Positive,
    Negative,
    #[default]
    All,
}

impl MomentumFilter {
    pub fn keeps(&self, technical_score: i32) -> bool {
        match self {
            MomentumFilter::Positive => technical_score >= MOMENTUM_THRESHOLD,
            MomentumFilter::Negative => technical_score < MOMENTUM_THRESHOLD,
            MomentumFilter::All => true,
        }
    }
}

/// Score one record. Fewer than [`MIN_SCORE_BARS`] bars short-circuits to
/// all zeroes; that is a policy, not an error.
pub fn score(record: &StockRecord) -> ScoreResult {
    if record.bar_count() < MIN_SCORE_BARS {
        return ScoreResult::zero();
    }

    let fundamental = fundamental_score(record);
    let technical = technical_score(record);

    ScoreResult {
        total: fundamental + technical,
        fundamental,
        technical,
    }
}

fn fundamental_score(record: &StockRecord) -> i32 {
    let fund = &record.fundamentals;
    let mut points = 0;

    if fund.eps_growth.is_some_and(|g| g > 0.25) {
        points += 40;
    }
    if fund.roe.is_some_and(|r| r > 0.17) {
        points += 30;
    }
    match fund.market_cap {
        Some(cap) if cap > 10e9 => points += 10,
        Some(cap) if cap > 2e9 => points += 5,
        _ => {}
    }

    points
}

fn technical_score(record: &StockRecord) -> i32 {
    let closes: Vec<f64> = record.hist.iter().map(|b| b.close).collect();
    let n = closes.len();

    let rsi_series = rsi(&closes, RSI_PERIOD);
    let macd_series = macd_default(&closes);
    let sma_series = sma(&closes, SMA_PERIOD);

    let mut points = 0;

    // Momentum rising without being overbought.
    if let (Some(latest), Some(prev)) = (rsi_series[n - 1], rsi_series[n - 2]) {
        if latest > prev && latest < RSI_OVERBOUGHT && prev < RSI_OVERBOUGHT {
            points += 20;
        }
    }

    // Bullish MACD crossover state.
    if let Some(point) = macd_series[n - 1] {
        if point.line > point.signal {
            points += 20;
        }
    }

    // Primary trend filter.
    if let Some(sma_200) = sma_series[n - 1] {
        if closes[n - 1] > sma_200 {
            points += 20;
        }
    }

    // Near new-high breakout zone, judged on the fundamentals quote.
    if record.fundamentals.near_fifty_two_week_high() {
        points += 20;
    }

    points
}
