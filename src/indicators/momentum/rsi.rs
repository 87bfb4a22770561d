//! RSI (Relative Strength Index) and Stochastic RSI

use crate::common::math;
use crate::models::indicators::StochRsiSeries;

pub const RSI_PERIOD: usize = 14;

/// Calculate the RSI series using Wilder's smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gains = math::wilder_series(&gains, period);
    let avg_losses = math::wilder_series(&losses, period);

    for (i, (gain, loss)) in avg_gains.iter().zip(avg_losses.iter()).enumerate() {
        if let (Some(gain), Some(loss)) = (gain, loss) {
            out[i + 1] = Some(rsi_from_averages(*gain, *loss));
        }
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // flat prices carry no direction
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate Stochastic RSI (%K and %D)
///
/// StochRSI = (RSI - min(RSI, n)) / (max(RSI, n) - min(RSI, n)) * 100,
/// %K is its SMA over `k_smooth`, %D the SMA of %K over `d_smooth`.
pub fn stoch_rsi_series(
    closes: &[f64],
    rsi_period: usize,
    stoch_period: usize,
    k_smooth: usize,
    d_smooth: usize,
) -> StochRsiSeries {
    let rsi = rsi_series(closes, rsi_period);
    let ranges = math::rolling_min_max(&rsi, stoch_period);

    let stoch: Vec<Option<f64>> = rsi
        .iter()
        .zip(ranges.iter())
        .map(|(value, range)| match (value, range) {
            (Some(value), Some((min, max))) if max > min => Some((value - min) / (max - min) * 100.0),
            (Some(_), Some(_)) => Some(50.0),
            _ => None,
        })
        .collect();

    let k = math::apply_to_defined(&stoch, |v| math::sma_series(v, k_smooth));
    let d = math::apply_to_defined(&k, |v| math::sma_series(v, d_smooth));

    StochRsiSeries { k, d }
}

/// Stochastic RSI with default parameters (14, 14, 3, 3)
pub fn stoch_rsi_default(closes: &[f64]) -> StochRsiSeries {
    stoch_rsi_series(closes, 14, 14, 3, 3)
}
