//! Rule thresholds and their environment-variable layering
//!
//! Resolution order, lowest priority first:
//! 1. built-in defaults
//! 2. global variables named after the key (`RSI_OVERBOUGHT`)
//! 3. per-symbol variables (`BTC_USDT_RSI_OVERSOLD` for `BTC/USDT`)
//! 4. explicit overrides passed by the caller

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("Invalid threshold in {var}: '{value}' is not a number")]
    InvalidValue { var: String, value: String },
}

/// Names of the configurable thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKey {
    RsiOverbought,
    RsiOversold,
    AdxTrend,
    BbwpHigh,
    BbwpLow,
}

impl ThresholdKey {
    pub const ALL: [ThresholdKey; 5] = [
        ThresholdKey::RsiOverbought,
        ThresholdKey::RsiOversold,
        ThresholdKey::AdxTrend,
        ThresholdKey::BbwpHigh,
        ThresholdKey::BbwpLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdKey::RsiOverbought => "rsi_overbought",
            ThresholdKey::RsiOversold => "rsi_oversold",
            ThresholdKey::AdxTrend => "adx_trend",
            ThresholdKey::BbwpHigh => "bbwp_high",
            ThresholdKey::BbwpLow => "bbwp_low",
        }
    }

    /// Global environment variable name, e.g. `RSI_OVERBOUGHT`
    pub fn env_name(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Per-symbol environment variable name, e.g. `BTC_USDT_RSI_OVERBOUGHT`
    pub fn symbol_env_name(&self, symbol: &str) -> String {
        format!("{}_{}", symbol_env_prefix(symbol), self.env_name())
    }
}

/// `BTC/USDT` -> `BTC_USDT`
pub fn symbol_env_prefix(symbol: &str) -> String {
    symbol.to_uppercase().replace('/', "_")
}

/// Threshold values used by the rule set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub adx_trend: f64,
    /// High volatility
    pub bbwp_high: f64,
    /// Low volatility
    pub bbwp_low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            adx_trend: 25.0,
            bbwp_high: 4.0,
            bbwp_low: 1.5,
        }
    }
}

impl Thresholds {
    pub fn get(&self, key: ThresholdKey) -> f64 {
        match key {
            ThresholdKey::RsiOverbought => self.rsi_overbought,
            ThresholdKey::RsiOversold => self.rsi_oversold,
            ThresholdKey::AdxTrend => self.adx_trend,
            ThresholdKey::BbwpHigh => self.bbwp_high,
            ThresholdKey::BbwpLow => self.bbwp_low,
        }
    }

    pub fn set(&mut self, key: ThresholdKey, value: f64) {
        match key {
            ThresholdKey::RsiOverbought => self.rsi_overbought = value,
            ThresholdKey::RsiOversold => self.rsi_oversold = value,
            ThresholdKey::AdxTrend => self.adx_trend = value,
            ThresholdKey::BbwpHigh => self.bbwp_high = value,
            ThresholdKey::BbwpLow => self.bbwp_low = value,
        }
    }

    /// Resolve thresholds for a symbol from the process environment
    pub fn from_env(symbol: &str) -> Result<Self, ThresholdError> {
        Self::resolve(symbol, |name| std::env::var(name).ok(), &[])
    }

    /// Resolve thresholds through every layer using `lookup` as the variable source
    pub fn resolve<F>(
        symbol: &str,
        lookup: F,
        overrides: &[(ThresholdKey, f64)],
    ) -> Result<Self, ThresholdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut thresholds = Self::default();

        for key in ThresholdKey::ALL {
            if let Some(value) = read_var(&lookup, &key.env_name())? {
                thresholds.set(key, value);
            }
        }

        for key in ThresholdKey::ALL {
            if let Some(value) = read_var(&lookup, &key.symbol_env_name(symbol))? {
                thresholds.set(key, value);
            }
        }

        for (key, value) in overrides {
            thresholds.set(*key, *value);
        }

        Ok(thresholds)
    }
}

fn read_var<F>(lookup: &F, name: &str) -> Result<Option<f64>, ThresholdError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ThresholdError::InvalidValue {
                var: name.to_string(),
                value: raw,
            }),
    }
}
