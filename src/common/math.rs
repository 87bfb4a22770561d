//! Numeric helpers shared by the indicator implementations.
//!
//! Series helpers return one slot per input row. `None` marks rows where the
//! look-back window is not full yet, so a series can be lined up with the
//! candles it was computed from.

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n)
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Sample standard deviation (divides by n - 1)
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// True range of a bar given the previous close
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Simple moving average series
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut window_sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(window_sum / period as f64);
    for i in period..values.len() {
        window_sum += values[i] - values[i - period];
        out[i] = Some(window_sum / period as f64);
    }
    out
}

/// Exponential moving average series, seeded with the SMA of the first window
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);
    for i in period..values.len() {
        prev = ema_from_previous(values[i], prev, alpha);
        out[i] = Some(prev);
    }
    out
}

/// Wilder's smoothing (RMA), seeded with the SMA of the first window
pub fn wilder_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let n = period as f64;
    let mut prev = values[..period].iter().sum::<f64>() / n;
    out[period - 1] = Some(prev);
    for i in period..values.len() {
        prev = (prev * (n - 1.0) + values[i]) / n;
        out[i] = Some(prev);
    }
    out
}

/// Rolling population standard deviation series
pub fn rolling_std_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for end in period..=values.len() {
        out[end - 1] = population_std_dev(&values[end - period..end]);
    }
    out
}

/// Rolling minimum/maximum over a partially defined series.
///
/// A slot is defined only when every value in its window is defined.
pub fn rolling_min_max(series: &[Option<f64>], period: usize) -> Vec<Option<(f64, f64)>> {
    let mut out = vec![None; series.len()];
    if period == 0 || series.len() < period {
        return out;
    }
    for end in period..=series.len() {
        let window: Option<Vec<f64>> = series[end - period..end].iter().copied().collect();
        if let Some(window) = window {
            let min = window.iter().copied().fold(f64::INFINITY, f64::min);
            let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            out[end - 1] = Some((min, max));
        }
    }
    out
}

/// Applies a series function to the defined run of a partially defined
/// series and lines the result back up with the input rows.
pub fn apply_to_defined<F>(series: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Vec<Option<f64>>,
{
    let mut out = vec![None; series.len()];
    let Some(start) = series.iter().position(Option::is_some) else {
        return out;
    };

    let run: Vec<f64> = series[start..].iter().map_while(|v| *v).collect();
    for (offset, value) in f(&run).into_iter().enumerate() {
        out[start + offset] = value;
    }
    out
}

/// Last defined value of a series
pub fn last_defined(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

/// Value of the last row, `None` when that row is undefined
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Percentage change between consecutive values (`n - 1` entries)
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

/// Calculate EMA from previous EMA value
pub fn ema_from_previous(value: f64, prev_ema: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * prev_ema
}

/// Rounds to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Keeps finite values, maps NaN and infinities to `None`
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
