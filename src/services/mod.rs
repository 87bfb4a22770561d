//! Market data access and the endpoint-level services built on it.

pub mod averages;
pub mod chart;
pub mod dominance;
pub mod exchanges;
pub mod market_data;
pub mod movements;

pub use averages::AveragesService;
pub use chart::ChartService;
pub use dominance::DominanceService;
pub use market_data::{MarketDataError, MarketDataProvider, MarketDataService};
pub use movements::MovementsService;
