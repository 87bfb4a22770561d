//! ATR (Average True Range) and close-to-close volatility

use crate::common::math;

pub const ATR_PERIOD: usize = 14;
pub const VOLATILITY_WINDOW: usize = 20;

/// Calculate the ATR series using Wilder's smoothing of the true range
pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut out = vec![None; n];
    if n < 2 {
        return out;
    }

    let tr_values: Vec<f64> = (1..n)
        .map(|i| math::true_range(highs[i], lows[i], closes[i - 1]))
        .collect();

    for (j, value) in math::wilder_series(&tr_values, period).into_iter().enumerate() {
        out[j + 1] = value;
    }
    out
}

/// Sample standard deviation of the last `window` close-to-close returns, in percent
pub fn rolling_volatility(closes: &[f64], window: usize) -> Option<f64> {
    let returns = math::pct_changes(closes);
    if window < 2 || returns.len() < window {
        return None;
    }
    math::sample_std_dev(&returns[returns.len() - window..]).and_then(math::finite)
}
