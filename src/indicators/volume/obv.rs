//! On-Balance Volume and the simplified Konkorde reading built on it

use crate::common::math;

pub const KONKORDE_EMA_PERIOD: usize = 20;

/// Cumulative signed volume. The first bar counts as an up bar.
pub fn obv_series(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(volumes.len());
    let mut out = Vec::with_capacity(n);
    let mut running = 0.0;

    for i in 0..n {
        let direction = if i == 0 {
            1.0
        } else if closes[i] > closes[i - 1] {
            1.0
        } else if closes[i] < closes[i - 1] {
            -1.0
        } else {
            0.0
        };
        running += direction * volumes[i];
        out.push(running);
    }
    out
}

/// Simplified Konkorde: OBV minus its EMA. Positive values mean buying pressure.
pub fn konkorde_series(closes: &[f64], volumes: &[f64], ema_period: usize) -> Vec<Option<f64>> {
    let obv = obv_series(closes, volumes);
    let obv_ema = math::ema_series(&obv, ema_period);

    obv.iter()
        .zip(obv_ema.iter())
        .map(|(value, ema)| Some(value - (*ema)?))
        .collect()
}
