//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the first SMA, then EMA[i] = v[i]*k + EMA[i-1]*(1-k).
//! Warmup: first n-1 indices are undefined.

pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut current = 0.0;
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i + 1 < period {
            sum += v;
            out.push(None);
        } else if i + 1 == period {
            sum += v;
            current = sum / period as f64;
            out.push(Some(current));
        } else {
            current = v * k + current * (1.0 - k);
            out.push(Some(current));
        }
    }

    out
}
