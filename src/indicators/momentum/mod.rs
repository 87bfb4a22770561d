//! Momentum indicators: RSI, Stochastic RSI, MACD, Awesome Oscillator

pub mod ao;
pub mod macd;
pub mod rsi;

pub use ao::*;
pub use macd::*;
pub use rsi::*;
