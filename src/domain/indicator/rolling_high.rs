//! Trailing-window maximum.
//!
//! Maximum over the trailing n values, current index included. Warmup: first
//! n-1 indices are undefined. The breakout strategy feeds closing prices, so
//! a value equal to the window max marks a fresh trailing-high close.

pub fn rolling_high(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        let max = window.iter().copied().fold(f64::MIN, f64::max);
        out.push(Some(max));
    }

    out
}
