//! Vote tallying

use crate::models::signal::Signal;

/// Minimum number of agreeing votes for a directional signal
pub const MIN_VOTES: usize = 4;

/// Decide the signal by majority
pub struct Aggregator;

impl Aggregator {
    /// `Entry` needs at least [`MIN_VOTES`] entry votes and strictly more
    /// entry than exit votes; `Exit` mirrors it. Anything else is `Neutral`.
    pub fn decide(entry_votes: usize, exit_votes: usize) -> Signal {
        if entry_votes >= MIN_VOTES && entry_votes > exit_votes {
            Signal::Entry
        } else if exit_votes >= MIN_VOTES && exit_votes > entry_votes {
            Signal::Exit
        } else {
            Signal::Neutral
        }
    }
}
