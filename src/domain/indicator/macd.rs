//! Moving Average Convergence-Divergence.
//!
//! Line = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the line,
//! seeded with the mean of its first signal_period defined values;
//! histogram = line - signal. A point is defined once both line and signal
//! are, i.e. from index slow + signal_period - 2.

use super::ema::ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<Option<MacdPoint>> {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return vec![None; closes.len()];
    }

    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // EMA of the line, restricted to the indices where the line is defined.
    let line_start = slow.saturating_sub(1);
    let defined: Vec<f64> = line.iter().skip(line_start).flatten().copied().collect();
    let signal_tail = ema(&defined, signal_period);

    let mut out = vec![None; closes.len()];
    for (offset, signal) in signal_tail.into_iter().enumerate() {
        let i = line_start + offset;
        if let (Some(line_v), Some(signal_v)) = (line[i], signal) {
            out[i] = Some(MacdPoint {
                line: line_v,
                signal: signal_v,
                histogram: line_v - signal_v,
            });
        }
    }

    out
}

pub fn macd_default(closes: &[f64]) -> Vec<Option<MacdPoint>> {
    macd(closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}
