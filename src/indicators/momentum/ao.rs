//! Awesome Oscillator

use crate::common::math;
use crate::models::candle::CandleSeries;

pub const AO_FAST: usize = 5;
pub const AO_SLOW: usize = 34;

/// AO = SMA(fast) of the bar midpoint - SMA(slow) of the bar midpoint
pub fn awesome_oscillator_series(candles: &CandleSeries, fast: usize, slow: usize) -> Vec<Option<f64>> {
    let median: Vec<f64> = candles.iter().map(|c| c.hl2()).collect();
    let fast_sma = math::sma_series(&median, fast);
    let slow_sma = math::sma_series(&median, slow);

    fast_sma
        .iter()
        .zip(slow_sma.iter())
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect()
}
