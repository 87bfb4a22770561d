//! Fixed indicator pipeline producing the last-candle snapshot

use tracing::debug;

use crate::common::math;
use crate::indicators::{momentum, trend, volatility, volume};
use crate::models::candle::CandleSeries;
use crate::models::indicators::{IndicatorSnapshot, KonkordeSignal};

/// Computes every indicator the rules and API payloads need.
pub struct IndicatorsService;

impl IndicatorsService {
    /// Run the whole pipeline and read the values at the last candle
    pub fn calculate_all(candles: &CandleSeries) -> IndicatorSnapshot {
        let closes = candles.closes();
        let highs = candles.highs();
        let lows = candles.lows();
        let volumes = candles.volumes();

        debug!(candles = candles.len(), "Calculating indicator snapshot");

        let mut snapshot = IndicatorSnapshot {
            rsi14: math::last_value(&momentum::rsi_series(&closes, momentum::RSI_PERIOD)),
            adx14: math::last_value(&trend::adx_series(&highs, &lows, &closes, trend::ADX_PERIOD)),
            ..IndicatorSnapshot::default()
        };

        Self::apply_bbwp(&mut snapshot, &closes);
        Self::apply_awesome_oscillator(&mut snapshot, candles);
        Self::apply_moving_averages(&mut snapshot, candles);
        Self::apply_konkorde(&mut snapshot, &closes, &volumes);
        Self::apply_extended(&mut snapshot, &highs, &lows, &closes);

        snapshot
    }

    fn apply_bbwp(snapshot: &mut IndicatorSnapshot, closes: &[f64]) {
        let bands = volatility::bollinger_series(closes, volatility::BB_PERIOD, volatility::BB_STD_DEV);
        let width = volatility::bbwp_series(&bands);
        let smoothed = volatility::bbwp_smoothed(&width, volatility::BBWP_SMOOTHING);

        snapshot.bbwp = math::last_value(&width);
        snapshot.bbwp_ma4 = math::last_value(&smoothed);
    }

    fn apply_awesome_oscillator(snapshot: &mut IndicatorSnapshot, candles: &CandleSeries) {
        let ao = momentum::awesome_oscillator_series(candles, momentum::AO_FAST, momentum::AO_SLOW);
        snapshot.ao = Some(math::last_defined(&ao).unwrap_or(0.0));
    }

    fn apply_moving_averages(snapshot: &mut IndicatorSnapshot, candles: &CandleSeries) {
        for period in trend::MA_PERIODS {
            let sma = Some(math::last_defined(&trend::sma(candles, period)).unwrap_or(0.0));
            let ema = Some(math::last_defined(&trend::ema(candles, period)).unwrap_or(0.0));
            match period {
                50 => {
                    snapshot.sma50 = sma;
                    snapshot.ema50 = ema;
                }
                200 => {
                    snapshot.sma200 = sma;
                    snapshot.ema200 = ema;
                }
                _ => {}
            }
        }
    }

    fn apply_konkorde(snapshot: &mut IndicatorSnapshot, closes: &[f64], volumes: &[f64]) {
        let konkorde = volume::konkorde_series(closes, volumes, volume::KONKORDE_EMA_PERIOD);
        snapshot.konkorde_value = math::last_value(&konkorde);
        snapshot.konkorde_signal = snapshot.konkorde_value.map(|value| {
            if value > 0.0 {
                KonkordeSignal::Bullish
            } else {
                KonkordeSignal::Bearish
            }
        });
    }

    fn apply_extended(snapshot: &mut IndicatorSnapshot, highs: &[f64], lows: &[f64], closes: &[f64]) {
        let macd = momentum::macd_default(closes);
        snapshot.macd = math::last_value(&macd.macd);
        snapshot.macd_signal = math::last_value(&macd.signal);
        snapshot.macd_hist = math::last_value(&macd.histogram);

        let stoch = momentum::stoch_rsi_default(closes);
        snapshot.stoch_rsi_k = math::last_value(&stoch.k);
        snapshot.stoch_rsi_d = math::last_value(&stoch.d);

        snapshot.atr14 = math::last_value(&volatility::atr_series(highs, lows, closes, volatility::ATR_PERIOD));
        snapshot.volatility20 = volatility::rolling_volatility(closes, volatility::VOLATILITY_WINDOW);
    }
}
