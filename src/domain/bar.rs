//! Daily OHLCV bar representation.
//!
//! Serde field names match the persisted stock-data store, which keeps the
//! capitalized column names of the upstream data provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ScreenerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: i64,
}

/// Collect the closing prices of a bar series.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Check the ordering invariant: strictly increasing dates, no duplicates.
///
/// A series that violates it counts as malformed history, not a usable
/// shorter series.
pub fn validate_bars(ticker: &str, bars: &[Bar]) -> Result<(), ScreenerError> {
    if bars.is_empty() {
        return Err(ScreenerError::DataUnavailable {
            ticker: ticker.to_string(),
        });
    }
    for window in bars.windows(2) {
        if window[1].date <= window[0].date {
            return Err(ScreenerError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }
    }
    Ok(())
}
