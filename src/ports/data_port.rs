//! Stock data access port trait.

use chrono::NaiveDateTime;

use crate::domain::error::ScreenerError;
use crate::domain::stock_record::StockRecord;

pub trait StockDataPort {
    /// Full record for one ticker, `None` when the universe has no entry.
    fn fetch(&self, ticker: &str) -> Result<Option<StockRecord>, ScreenerError>;

    /// Every ticker in the stored universe, sorted.
    fn tickers(&self) -> Result<Vec<String>, ScreenerError>;

    /// When the universe snapshot was last refreshed, if recorded.
    fn last_fetch(&self) -> Result<Option<NaiveDateTime>, ScreenerError>;
}
