//! Technical indicators computed over candle series.

pub mod momentum;
pub mod pipeline;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use pipeline::IndicatorsService;
