//! Core domain types and logic.

pub mod bar;
pub mod fundamentals;
pub mod stock_record;
pub mod indicator;
pub mod score;
pub mod screener;
pub mod strategy;
pub mod backtest;
pub mod metrics;
pub mod portfolio;
pub mod ledger;
pub mod error;
