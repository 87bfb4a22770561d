//! Shared helpers used across layers.

pub mod math;
pub mod ordered;
pub mod time;

pub use ordered::OrderedMap;
