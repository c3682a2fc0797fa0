//! Performance metrics over an equity curve.

/// Trading days per year, used to annualise returns and volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestResult {
    pub cagr_pct: f64,
    pub sharpe: f64,
    pub max_drawdown_pct: f64,
    pub trade_count: usize,
    pub final_equity: f64,
}

/// Compound annual growth rate in percent, annualised over the number of
/// bars in the curve.
pub fn compute_cagr_pct(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let initial = equity[0];
    let last = equity[equity.len() - 1];
    if initial <= 0.0 || last <= 0.0 {
        return 0.0;
    }
    let years_exponent = TRADING_DAYS_PER_YEAR / equity.len() as f64;
    ((last / initial).powf(years_exponent) - 1.0) * 100.0
}

/// Annualised Sharpe ratio of daily returns, zero risk-free rate. Zero when
/// returns have no variance.
pub fn compute_sharpe(equity: &[f64]) -> f64 {
    let returns = daily_returns(equity);
    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }
    mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline in percent. Non-negative; zero for a
/// curve that never falls below a prior peak.
pub fn compute_max_drawdown_pct(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_drawdown = 0.0;

    for &value in equity {
        peak = peak.max(value);
        if peak > 0.0 {
            let drawdown = (peak - value) / peak * 100.0;
            max_drawdown = f64::max(max_drawdown, drawdown);
        }
    }

    max_drawdown
}

fn daily_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}
