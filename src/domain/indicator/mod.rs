//! Technical indicators as pure functions over plain ordered sequences.
//!
//! Every function returns one output slot per input index. A slot is `None`
//! during the indicator's warmup, or everywhere when the series is shorter
//! than the lookback; callers treat `None` as "criterion not met".

pub mod ema;
pub mod macd;
pub mod rolling_high;
pub mod rsi;
pub mod sma;

pub use ema::ema;
pub use macd::{macd, macd_default, MacdPoint, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
pub use rolling_high::rolling_high;
pub use rsi::rsi;
pub use sma::sma;

/// Default RSI lookback.
pub const RSI_PERIOD: usize = 14;
/// Long-term trend filter length.
pub const SMA_PERIOD: usize = 200;
/// Trailing-year breakout window (trading days).
pub const ROLLING_HIGH_PERIOD: usize = 252;
