//! Paper trading ledger.
//!
//! Wraps the in-memory [`Portfolio`] with a persistence port so every
//! successful mutation is written straight back to the store. When a save
//! fails the in-memory state is still authoritative; the failure is logged
//! and surfaced so the caller knows the snapshot on disk is stale.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::error::ScreenerError;
use super::portfolio::{Portfolio, StopSale};
use super::strategy::StrategyParams;
use crate::ports::log_port::ErrorLogPort;
use crate::ports::store_port::PortfolioStore;

pub struct PaperLedger<'a> {
    portfolio: Portfolio,
    store: &'a dyn PortfolioStore,
    log: &'a dyn ErrorLogPort,
}

impl<'a> PaperLedger<'a> {
    /// Restore the ledger from the store; a missing snapshot yields a fresh
    /// default portfolio.
    pub fn open(
        store: &'a dyn PortfolioStore,
        log: &'a dyn ErrorLogPort,
    ) -> Result<Self, ScreenerError> {
        let portfolio = store.load()?;
        Ok(PaperLedger {
            portfolio,
            store,
            log,
        })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn buy(
        &mut self,
        ticker: &str,
        shares: u64,
        price: f64,
        date: NaiveDate,
    ) -> Result<(), ScreenerError> {
        self.portfolio.buy(ticker, shares, price, date)?;
        self.persist(ticker)
    }

    pub fn sell(&mut self, ticker: &str, shares: u64, price: f64) -> Result<(), ScreenerError> {
        self.portfolio.sell(ticker, shares, price)?;
        self.persist(ticker)
    }

    /// Mark positions to the given prices and close any whose stops fire.
    /// The snapshot is saved even when nothing sold, so high-water marks
    /// survive restarts.
    pub fn revalue(
        &mut self,
        prices: &HashMap<String, f64>,
        params: &StrategyParams,
    ) -> Result<Vec<StopSale>, ScreenerError> {
        let sales = self.portfolio.revalue(prices, params);
        self.persist("portfolio")?;
        Ok(sales)
    }

    fn persist(&self, context: &str) -> Result<(), ScreenerError> {
        if let Err(err) = self.store.save(&self.portfolio) {
            self.log.log(context, &err.to_string());
            return Err(err);
        }
        Ok(())
    }
}
