//! Paper portfolio: cash plus open positions.
//!
//! Paper fills are commission-free and settle at the supplied price. Repeat
//! buys merge into one position at the weighted average price.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ScreenerError;
use super::strategy::{exit_triggered, StrategyParams};

/// Starting cash for a fresh paper portfolio.
pub const DEFAULT_PAPER_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub shares: u64,
    pub avg_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_date: Option<NaiveDate>,
    /// Absent in snapshots written before trailing stops existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_water_mark: Option<f64>,
}

impl Position {
    /// Trailing-stop reference; falls back to the average entry price for
    /// positions restored without one.
    pub fn high_water_mark(&self) -> f64 {
        self.high_water_mark.unwrap_or(self.avg_price)
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }
}

/// An automatic sale made during revaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSale {
    pub ticker: String,
    pub shares: u64,
    pub price: f64,
    pub proceeds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub positions: Vec<Position>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Portfolio::new(DEFAULT_PAPER_CASH)
    }
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Portfolio {
            cash,
            positions: Vec::new(),
        }
    }

    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.ticker == ticker)
    }

    /// Buy `shares` at `price`. Rejects the order outright when the cost
    /// exceeds available cash; a partial fill is never taken.
    pub fn buy(
        &mut self,
        ticker: &str,
        shares: u64,
        price: f64,
        date: NaiveDate,
    ) -> Result<(), ScreenerError> {
        let cost = shares as f64 * price;
        if cost > self.cash {
            return Err(ScreenerError::InsufficientFunds {
                needed: cost,
                available: self.cash,
            });
        }

        self.cash -= cost;
        match self.positions.iter_mut().find(|p| p.ticker == ticker) {
            Some(position) => {
                let total_shares = position.shares + shares;
                let total_cost = position.shares as f64 * position.avg_price + cost;
                position.avg_price = total_cost / total_shares as f64;
                position.shares = total_shares;
                position.high_water_mark = Some(position.high_water_mark().max(price));
            }
            None => self.positions.push(Position {
                ticker: ticker.to_string(),
                shares,
                avg_price: price,
                buy_date: Some(date),
                high_water_mark: Some(price),
            }),
        }
        Ok(())
    }

    /// Sell `shares` at `price`. Rejects the order when the position is
    /// missing or too small; a closed-out position is removed entirely.
    pub fn sell(&mut self, ticker: &str, shares: u64, price: f64) -> Result<(), ScreenerError> {
        let held = self.position(ticker).map_or(0, |p| p.shares);
        if shares > held {
            return Err(ScreenerError::InsufficientShares {
                ticker: ticker.to_string(),
                requested: shares,
                held,
            });
        }

        self.cash += shares as f64 * price;
        let position = self
            .positions
            .iter_mut()
            .find(|p| p.ticker == ticker)
            .expect("held > 0 implies the position exists");
        position.shares -= shares;
        if position.shares == 0 {
            self.positions.retain(|p| p.ticker != ticker);
        }
        Ok(())
    }

    /// Mark every position to the latest price, raise high-water marks, and
    /// close any position whose stop rules fire. Positions without a quote
    /// are left untouched.
    pub fn revalue(
        &mut self,
        prices: &HashMap<String, f64>,
        params: &StrategyParams,
    ) -> Vec<StopSale> {
        let mut sales = Vec::new();

        for position in &mut self.positions {
            let Some(&price) = prices.get(&position.ticker) else {
                continue;
            };
            let mark = position.high_water_mark().max(price);
            position.high_water_mark = Some(mark);

            if exit_triggered(params, position.avg_price, mark, price) {
                sales.push(StopSale {
                    ticker: position.ticker.clone(),
                    shares: position.shares,
                    price,
                    proceeds: position.shares as f64 * price,
                });
            }
        }

        for sale in &sales {
            self.cash += sale.proceeds;
            self.positions.retain(|p| p.ticker != sale.ticker);
        }

        sales
    }

    /// Cash plus positions marked at the latest price, or at the average
    /// entry price when no quote is available.
    pub fn total_value(&self, prices: &HashMap<String, f64>) -> f64 {
        self.cash
            + self
                .positions
                .iter()
                .map(|p| p.market_value(*prices.get(&p.ticker).unwrap_or(&p.avg_price)))
                .sum::<f64>()
    }
}
