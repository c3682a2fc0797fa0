//! Point-in-time fundamentals snapshot for one ticker.
//!
//! Optional fields mean "unknown to the data provider", never zero. Scoring
//! treats an unknown value as a criterion not met.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub eps_growth: Option<f64>,
    pub roe: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(default = "unknown_sector")]
    pub sector: String,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    pub price: f64,
    #[serde(rename = "fiftyTwoWeekHigh")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(rename = "twoHundredDayAverage")]
    pub two_hundred_day_average: Option<f64>,
}

fn unknown_sector() -> String {
    "Unknown".to_string()
}

impl FundamentalsSnapshot {
    /// Snapshot with nothing known beyond the latest price, for records
    /// built from bare price history.
    pub fn unknown(price: f64) -> Self {
        FundamentalsSnapshot {
            eps_growth: None,
            roe: None,
            market_cap: None,
            sector: unknown_sector(),
            pe_ratio: None,
            price,
            fifty_two_week_high: None,
            two_hundred_day_average: None,
        }
    }

    /// True when the current price sits within 5% of the 52-week high.
    /// Unknown high means the breakout-zone test cannot pass.
    pub fn near_fifty_two_week_high(&self) -> bool {
        match self.fifty_two_week_high {
            Some(high) => self.price >= 0.95 * high,
            None => false,
        }
    }
}
