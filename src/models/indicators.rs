use serde::{Deserialize, Serialize};

/// Direction reported by the simplified Konkorde reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KonkordeSignal {
    Bullish,
    Bearish,
}

/// Indicator values at the last candle of a series.
///
/// A field is `None` when the series is too short for its look-back window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi14: Option<f64>,
    pub adx14: Option<f64>,
    pub bbwp: Option<f64>,
    pub bbwp_ma4: Option<f64>,
    pub ao: Option<f64>,
    pub sma50: Option<f64>,
    pub ema50: Option<f64>,
    pub sma200: Option<f64>,
    pub ema200: Option<f64>,
    pub konkorde_value: Option<f64>,
    pub konkorde_signal: Option<KonkordeSignal>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub stoch_rsi_k: Option<f64>,
    pub stoch_rsi_d: Option<f64>,
    pub atr14: Option<f64>,
    pub volatility20: Option<f64>,
}

/// MACD lines aligned with the input rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Stochastic RSI lines aligned with the input rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochRsiSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Bollinger Bands aligned with the input rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}
