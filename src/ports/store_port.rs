//! Persistence port traits for the paper portfolio and watchlist.

use crate::domain::error::ScreenerError;
use crate::domain::portfolio::Portfolio;

pub trait PortfolioStore {
    /// Stored portfolio, or a fresh default when none has been saved yet.
    fn load(&self) -> Result<Portfolio, ScreenerError>;
    fn save(&self, portfolio: &Portfolio) -> Result<(), ScreenerError>;
}

pub trait WatchlistStore {
    /// Stored tickers, or empty when none has been saved yet.
    fn load(&self) -> Result<Vec<String>, ScreenerError>;
    fn save(&self, tickers: &[String]) -> Result<(), ScreenerError>;
}
