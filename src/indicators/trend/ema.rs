//! Moving averages over closing prices

use crate::common::math;
use crate::models::candle::CandleSeries;

/// Periods reported in the indicator snapshot
pub const MA_PERIODS: [usize; 2] = [50, 200];

/// SMA of closes
pub fn sma(candles: &CandleSeries, period: usize) -> Vec<Option<f64>> {
    math::sma_series(&candles.closes(), period)
}

/// EMA of closes, seeded with the SMA of the first window
pub fn ema(candles: &CandleSeries, period: usize) -> Vec<Option<f64>> {
    math::ema_series(&candles.closes(), period)
}
