//! Bollinger Bands and Bollinger Band Width Percentage

use crate::common::math;
use crate::models::indicators::BollingerSeries;

pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;
pub const BBWP_SMOOTHING: usize = 4;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn bollinger_series(closes: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    let middle = math::sma_series(closes, period);
    let deviation = math::rolling_std_series(closes, period);

    let upper = middle
        .iter()
        .zip(deviation.iter())
        .map(|(m, s)| Some((*m)? + std_dev * (*s)?))
        .collect();
    let lower = middle
        .iter()
        .zip(deviation.iter())
        .map(|(m, s)| Some((*m)? - std_dev * (*s)?))
        .collect();

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

/// Band width as a percentage of the middle band: (Upper - Lower) / Middle * 100
pub fn bbwp_series(bands: &BollingerSeries) -> Vec<Option<f64>> {
    bands
        .upper
        .iter()
        .zip(bands.lower.iter())
        .zip(bands.middle.iter())
        .map(|((u, l), m)| {
            let middle = (*m)?;
            if middle == 0.0 {
                return None;
            }
            Some(((*u)? - (*l)?) / middle * 100.0)
        })
        .collect()
}

/// Rolling mean of the band width to reduce noise
pub fn bbwp_smoothed(bbwp: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    math::apply_to_defined(bbwp, |v| math::sma_series(v, period))
}
