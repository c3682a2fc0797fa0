//! Per-ticker bundle of price history and fundamentals.

use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::fundamentals::FundamentalsSnapshot;

/// Everything the scorer and backtester know about one ticker. Created or
/// replaced wholesale by a data refresh; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(skip, default)]
    pub ticker: String,
    pub hist: Vec<Bar>,
    pub fundamentals: FundamentalsSnapshot,
}

impl StockRecord {
    pub fn new(ticker: impl Into<String>, hist: Vec<Bar>, fundamentals: FundamentalsSnapshot) -> Self {
        StockRecord {
            ticker: ticker.into(),
            hist,
            fundamentals,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.hist.len()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.hist.last().map(|b| b.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record(bar_count: usize) -> StockRecord {
        let hist = (0..bar_count)
            .map(|i| Bar {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 1000,
            })
            .collect();
        StockRecord::new(
            "AAPL",
            hist,
            FundamentalsSnapshot {
                eps_growth: None,
                roe: None,
                market_cap: None,
                sector: "Technology".into(),
                pe_ratio: None,
                price: 100.0,
                fifty_two_week_high: None,
                two_hundred_day_average: None,
            },
        )
    }

    #[test]
    fn bar_count_and_latest_close() {
        let record = sample_record(5);
        assert_eq!(record.bar_count(), 5);
        assert_eq!(record.latest_close(), Some(104.0));
    }

    #[test]
    fn latest_close_empty_history() {
        let record = sample_record(0);
        assert!(record.latest_close().is_none());
    }

    #[test]
    fn ticker_not_serialized() {
        // The store keys records by ticker; the field is rehydrated on load.
        let record = sample_record(1);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("AAPL"));
        assert!(json.contains("\"hist\""));
        assert!(json.contains("\"fundamentals\""));
    }
}
