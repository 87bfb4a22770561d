//! Volatility indicators: Bollinger Bands, BBWP, ATR

pub mod atr;
pub mod bollinger;

pub use atr::*;
pub use bollinger::*;
