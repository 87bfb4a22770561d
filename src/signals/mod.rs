//! Signal evaluation: thresholds, rules and vote aggregation.

pub mod aggregation;
pub mod rules;
pub mod scoring;
pub mod thresholds;

pub use aggregation::*;
pub use rules::RulesService;
pub use scoring::*;
pub use thresholds::{ThresholdError, ThresholdKey, Thresholds};
