//! Volume indicators: OBV, Konkorde

pub mod obv;

pub use obv::*;
