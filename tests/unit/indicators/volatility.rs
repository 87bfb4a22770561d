//! Unit tests for Bollinger width, ATR and return volatility

use cryptometrics::indicators::volatility::*;

use crate::fixtures::{candles_from_closes, uptrend};

#[test]
fn test_bollinger_constant_prices_have_zero_width() {
    let closes = vec![50.0; 30];
    let bands = bollinger_series(&closes, BB_PERIOD, BB_STD_DEV);
    assert_eq!(bands.middle[18], None);
    assert_eq!(bands.middle[19], Some(50.0));
    assert_eq!(bands.upper[29], Some(50.0));

    let width = bbwp_series(&bands);
    assert_eq!(width[29], Some(0.0));
}

#[test]
fn test_bbwp_uses_population_std() {
    // window of 20 alternating 9/11: population std is exactly 1
    let closes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 9.0 } else { 11.0 }).collect();
    let bands = bollinger_series(&closes, BB_PERIOD, BB_STD_DEV);
    let width = bbwp_series(&bands);
    assert!((width[19].unwrap() - 40.0).abs() < 1e-9);
}

#[test]
fn test_bbwp_smoothing_alignment() {
    let closes = uptrend(30).closes();
    let width = bbwp_series(&bollinger_series(&closes, BB_PERIOD, BB_STD_DEV));
    let smoothed = bbwp_smoothed(&width, BBWP_SMOOTHING);
    assert_eq!(smoothed[21], None);
    assert!(smoothed[22].is_some());

    let expected = (19..23).map(|i| width[i].unwrap()).sum::<f64>() / 4.0;
    assert!((smoothed[22].unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_atr_constant_true_range() {
    let candles = uptrend(30);
    let atr = atr_series(&candles.highs(), &candles.lows(), &candles.closes(), ATR_PERIOD);
    assert_eq!(atr[13], None);
    assert!((atr[14].unwrap() - 2.0).abs() < 1e-9);
    assert!((atr[29].unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn test_rolling_volatility() {
    assert_eq!(rolling_volatility(&[100.0; 10], VOLATILITY_WINDOW), None);
    assert_eq!(rolling_volatility(&[100.0; 21], VOLATILITY_WINDOW), Some(0.0));

    let candles = candles_from_closes(&(0..40).map(|i| 100.0 + (i % 3) as f64).collect::<Vec<_>>());
    assert!(rolling_volatility(&candles.closes(), VOLATILITY_WINDOW).unwrap() > 0.0);
}
