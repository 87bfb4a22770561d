//! Confidence calculation

use crate::common::math;

/// Share of votes that agree with a side, rounded to two decimals.
///
/// The denominator is never below one, so no votes at all gives 0.0.
pub fn calculate_confidence(supporting_votes: usize, opposing_votes: usize) -> f64 {
    let total = (supporting_votes + opposing_votes).max(1);
    math::round_to(supporting_votes as f64 / total as f64, 2)
}
