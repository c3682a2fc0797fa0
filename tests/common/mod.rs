//! Shared helpers for integration tests.

use canscreen::domain::bar::Bar;
use canscreen::domain::fundamentals::FundamentalsSnapshot;
use canscreen::domain::stock_record::StockRecord;
use chrono::NaiveDate;

pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000,
        })
        .collect()
}

pub fn strong_fundamentals(price: f64) -> FundamentalsSnapshot {
    FundamentalsSnapshot {
        eps_growth: Some(0.30),
        roe: Some(0.20),
        market_cap: Some(50e9),
        sector: "Technology".into(),
        pe_ratio: Some(28.0),
        price,
        fifty_two_week_high: Some(price),
        two_hundred_day_average: Some(price * 0.9),
    }
}

pub fn record(ticker: &str, closes: &[f64], fundamentals: FundamentalsSnapshot) -> StockRecord {
    StockRecord::new(ticker, make_bars(closes), fundamentals)
}

/// CSV in the `Date,Open,High,Low,Close,Volume` layout the adapters read.
pub fn bars_csv(closes: &[f64]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in make_bars(closes) {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    out
}
