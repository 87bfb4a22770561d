//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod signal;
pub mod timeframe;

pub use candle::{Candle, CandleSeries};
pub use indicators::{BollingerSeries, IndicatorSnapshot, KonkordeSignal, MacdSeries, StochRsiSeries};
pub use signal::{RuleEvaluation, Signal, VoteLabel};
pub use timeframe::{TimeframeSpec, TIMEFRAMES};
