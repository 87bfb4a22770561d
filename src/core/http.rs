//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::Config;
use crate::core::controller::MetricsController;
use crate::core::handlers;
use crate::metrics::Metrics;
use crate::services::{
    AveragesService, ChartService, DominanceService, MarketDataService, MovementsService,
};

/// Failures while building the shared state
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub market: MarketDataService,
    pub dominance: DominanceService,
    quiet_paths: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        metrics: Arc<Metrics>,
        market: MarketDataService,
        dominance: DominanceService,
    ) -> Self {
        Self {
            quiet_paths: Arc::new(config.quiet_paths()),
            config: Arc::new(config),
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            market,
            dominance,
        }
    }

    /// State wired to the real upstream APIs
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let metrics = Arc::new(Metrics::new()?);
        let market = MarketDataService::from_config(&config.upstream)?;
        let dominance = DominanceService::from_config(&config.upstream)?;
        Ok(Self::new(config, metrics, market, dominance))
    }

    pub fn controller(&self) -> MetricsController {
        MetricsController::new(self.market.clone())
    }

    pub fn averages(&self) -> AveragesService {
        AveragesService::new(self.market.clone())
    }

    pub fn charts(&self) -> ChartService {
        ChartService::new(self.market.clone())
    }

    pub fn movements(&self) -> MovementsService {
        MovementsService::new(self.market.clone())
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": state.config.service_name,
        "version": state.config.version,
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Tracks request metrics and writes one access line per request
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    } else if !state.quiet_paths.iter().any(|p| p == &path) {
        info!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request"
        );
    }

    response
}

fn mount(prefix: &str, path: &str) -> String {
    format!("{}{}", prefix, path)
}

/// API routes with the configured prefix applied
fn api_routes(config: &Config) -> Router<AppState> {
    let prefix = config.prefix_path.as_str();
    let mut router = Router::new().route(&mount(prefix, "/"), get(health_check));
    if !prefix.is_empty() {
        router = router.route(prefix, get(health_check));
    }

    let mut health_paths: Vec<&str> = Vec::new();
    for path in [config.healthy_path.as_str(), config.liveness_path.as_str()] {
        if !health_paths.contains(&path) {
            health_paths.push(path);
        }
    }
    for path in health_paths {
        router = router.route(&mount(prefix, path), get(health_check));
    }

    router = router.route(&mount(prefix, "/metrics/get"), get(handlers::get_metrics));
    router = router.route(
        &mount(prefix, "/charts/timeframes"),
        get(handlers::get_chart_timeframes),
    );

    let endpoints = [
        ("/averages", get(handlers::get_averages)),
        ("/charts", get(handlers::get_chart)),
        ("/movements", get(handlers::get_movements)),
        ("/dominance", get(handlers::get_dominance)),
    ];
    for (path, handler) in endpoints {
        router = router
            .route(&mount(prefix, path), handler.clone())
            .route(&mount(prefix, &format!("{}/", path)), handler);
    }

    router
}

pub fn create_router(state: AppState) -> Router {
    api_routes(&state.config)
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let address = format!("{}:{}", config.host, config.port);
    let prefix = config.prefix_path.clone();
    let state = AppState::from_config(config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(address = %address, "HTTP server listening on {}", address);
    info!("API mounted under '{}', Prometheus metrics at /metrics", prefix);
    axum::serve(listener, app).await?;

    Ok(())
}
