//! Trend-following entry and exit rules.
//!
//! One position per instrument, long-only. Entry requires the close above
//! its 200-day average and at a fresh 52-week closing high. Exit fires on
//! either a fixed stop below the entry price or a trailing stop below the
//! high-water mark.

use serde::{Deserialize, Serialize};

/// Default fixed stop: exit 7% below entry.
pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.07;

/// Default trailing stop: exit 10% below the high-water mark.
pub const DEFAULT_TRAIL_PCT: f64 = 0.10;

/// Default fixed order size.
pub const DEFAULT_FIXED_SHARES: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionSizing {
    /// Buy the same share count on every entry.
    FixedShares(u64),
    /// Spend this fraction of available cash on every entry.
    CashFraction(f64),
}

impl Default for PositionSizing {
    fn default() -> Self {
        PositionSizing::FixedShares(DEFAULT_FIXED_SHARES)
    }
}

impl PositionSizing {
    /// Share count for an entry at `price` with `cash` available. Zero when
    /// the sized order is unaffordable.
    pub fn shares(&self, cash: f64, price: f64) -> u64 {
        if price <= 0.0 {
            return 0;
        }
        match *self {
            PositionSizing::FixedShares(shares) => {
                if shares as f64 * price <= cash {
                    shares
                } else {
                    0
                }
            }
            PositionSizing::CashFraction(fraction) => (cash * fraction / price).floor() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    pub stop_loss_pct: f64,
    pub trail_pct: f64,
    pub sizing: PositionSizing,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            trail_pct: DEFAULT_TRAIL_PCT,
            sizing: PositionSizing::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionState {
    Flat,
    Long {
        entry_price: f64,
        high_water_mark: f64,
    },
}

/// What the strategy wants done at the current bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Hold,
    Enter,
    Exit,
}

/// True when either stop condition is breached at `close`.
///
/// Shared by the backtest engine and the paper ledger so live positions exit
/// under exactly the rules the simulation was run with.
pub fn exit_triggered(params: &StrategyParams, entry_price: f64, high_water_mark: f64, close: f64) -> bool {
    close <= entry_price * (1.0 - params.stop_loss_pct)
        || close <= high_water_mark * (1.0 - params.trail_pct)
}

/// Two-state machine driving one instrument.
#[derive(Debug, Clone)]
pub struct TrendFollower {
    params: StrategyParams,
    state: PositionState,
}

impl TrendFollower {
    pub fn new(params: StrategyParams) -> Self {
        TrendFollower {
            params,
            state: PositionState::Flat,
        }
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Evaluate one bar. The high-water mark is raised before the trailing
    /// stop is checked, so a new high on the exit bar is honoured.
    pub fn evaluate(
        &mut self,
        close: f64,
        sma_200: Option<f64>,
        rolling_high_252: Option<f64>,
    ) -> Signal {
        match self.state {
            PositionState::Flat => {
                let above_trend = sma_200.is_some_and(|sma| close > sma);
                let at_high = rolling_high_252.is_some_and(|high| close >= high);
                if above_trend && at_high {
                    Signal::Enter
                } else {
                    Signal::Hold
                }
            }
            PositionState::Long {
                entry_price,
                high_water_mark,
            } => {
                let high_water_mark = high_water_mark.max(close);
                self.state = PositionState::Long {
                    entry_price,
                    high_water_mark,
                };
                if exit_triggered(&self.params, entry_price, high_water_mark, close) {
                    Signal::Exit
                } else {
                    Signal::Hold
                }
            }
        }
    }

    /// Record a fill at `price`; the mark starts at the entry price.
    pub fn enter(&mut self, price: f64) {
        self.state = PositionState::Long {
            entry_price: price,
            high_water_mark: price,
        };
    }

    pub fn exit(&mut self) {
        self.state = PositionState::Flat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower() -> TrendFollower {
        TrendFollower::new(StrategyParams::default())
    }

    #[test]
    fn flat_holds_without_breakout() {
        let mut f = follower();
        assert_eq!(f.evaluate(100.0, Some(105.0), Some(110.0)), Signal::Hold);
        assert_eq!(f.state(), PositionState::Flat);
    }

    #[test]
    fn flat_holds_above_trend_but_below_high() {
        let mut f = follower();
        assert_eq!(f.evaluate(100.0, Some(90.0), Some(110.0)), Signal::Hold);
    }

    #[test]
    fn flat_holds_at_high_but_below_trend() {
        let mut f = follower();
        assert_eq!(f.evaluate(100.0, Some(105.0), Some(100.0)), Signal::Hold);
    }

    #[test]
    fn flat_enters_on_breakout() {
        let mut f = follower();
        assert_eq!(f.evaluate(100.0, Some(90.0), Some(100.0)), Signal::Enter);
    }

    #[test]
    fn flat_holds_when_indicators_undefined() {
        let mut f = follower();
        assert_eq!(f.evaluate(100.0, None, None), Signal::Hold);
        assert_eq!(f.evaluate(100.0, Some(90.0), None), Signal::Hold);
        assert_eq!(f.evaluate(100.0, None, Some(100.0)), Signal::Hold);
    }

    #[test]
    fn long_ignores_entry_conditions() {
        let mut f = follower();
        f.enter(100.0);
        // A fresh breakout while long is not a second entry.
        assert_eq!(f.evaluate(120.0, Some(90.0), Some(120.0)), Signal::Hold);
    }

    #[test]
    fn stop_loss_exits_at_seven_percent() {
        let mut f = follower();
        f.enter(100.0);
        assert_eq!(f.evaluate(93.5, None, None), Signal::Hold);
        assert_eq!(f.evaluate(93.0, None, None), Signal::Exit);
    }

    #[test]
    fn trailing_stop_tracks_high_water_mark() {
        let mut f = follower();
        f.enter(100.0);
        assert_eq!(f.evaluate(130.0, None, None), Signal::Hold);
        // 13% below entry but only 10% below the 130 mark.
        assert_eq!(f.evaluate(117.0, None, None), Signal::Exit);
    }

    #[test]
    fn high_water_mark_never_falls() {
        let mut f = follower();
        f.enter(100.0);
        f.evaluate(130.0, None, None);
        f.evaluate(125.0, None, None);
        match f.state() {
            PositionState::Long {
                high_water_mark, ..
            } => assert!((high_water_mark - 130.0).abs() < f64::EPSILON),
            PositionState::Flat => panic!("should still be long"),
        }
    }

    #[test]
    fn exit_resets_to_flat() {
        let mut f = follower();
        f.enter(100.0);
        f.exit();
        assert_eq!(f.state(), PositionState::Flat);
    }

    #[test]
    fn exit_triggered_boundaries() {
        let params = StrategyParams::default();
        assert!(exit_triggered(&params, 100.0, 100.0, 93.0));
        assert!(!exit_triggered(&params, 100.0, 100.0, 93.001));
        assert!(exit_triggered(&params, 100.0, 130.0, 117.0));
        assert!(!exit_triggered(&params, 100.0, 130.0, 117.001));
    }

    #[test]
    fn fixed_shares_sizing() {
        let sizing = PositionSizing::FixedShares(100);
        assert_eq!(sizing.shares(100_000.0, 50.0), 100);
        assert_eq!(sizing.shares(4_000.0, 50.0), 0);
    }

    #[test]
    fn cash_fraction_sizing_floors() {
        let sizing = PositionSizing::CashFraction(0.5);
        assert_eq!(sizing.shares(10_000.0, 33.0), 151);
    }

    #[test]
    fn sizing_rejects_bad_price() {
        assert_eq!(PositionSizing::default().shares(100_000.0, 0.0), 0);
    }
}
