//! HTTP layer and request orchestration

pub mod controller;
pub mod handlers;
pub mod http;

pub use controller::MetricsController;
pub use http::{create_router, start_server, AppState};
