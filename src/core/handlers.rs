//! Endpoint handlers: query parsing and response assembly

use axum::{
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    response::Json,
};
use chrono::Utc;
use futures_util::future::join_all;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::common::time::{parse_optional_datetime, TimeRange};
use crate::common::OrderedMap;
use crate::core::controller::{MetricsPayload, DEFAULT_CANDLES_LIMIT};
use crate::core::http::AppState;
use crate::error::AppError;
use crate::services::averages::{self, AverageIndicator, AveragesRequest, AveragesResponse};
use crate::services::chart::{self, ChartRequest, ChartResponse, TimeframeInfo};
use crate::services::dominance::canonical_coin;
use crate::services::movements::{
    MovementsRequest, MovementsResponse, RiskProfile, Side, DEFAULT_CAPITAL,
};

const DEFAULT_EXCHANGE: &str = "binance";
const DEFAULT_TIMEFRAME: &str = "1h";

/// `Query` whose rejection is reported as a JSON `AppError`
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)?;
        Ok(Self(value))
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required parameter '{}'", name)))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    span: &str,
) -> Result<TimeRange, AppError> {
    TimeRange::resolve(
        parse_optional_datetime(start)?,
        parse_optional_datetime(end)?,
        span,
        Utc::now(),
    )
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    symbol: Option<String>,
    exchange: Option<String>,
    timeframe: Option<String>,
    limit: Option<usize>,
}

pub async fn get_metrics(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<MetricsQuery>,
) -> Result<Json<MetricsPayload>, AppError> {
    let symbol = required(params.symbol, "symbol")?;
    let limit = params.limit.unwrap_or(DEFAULT_CANDLES_LIMIT);
    if limit == 0 {
        return Err(AppError::BadRequest("limit must be at least 1".to_string()));
    }

    let payload = state
        .controller()
        .process_symbol(
            &or_default(params.exchange, DEFAULT_EXCHANGE),
            &symbol,
            &or_default(params.timeframe, DEFAULT_TIMEFRAME),
            limit,
        )
        .await?;
    state.metrics.record_signal(payload.signals.signal);

    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
pub struct AveragesQuery {
    symbol: Option<String>,
    timeframe: Option<String>,
    exchange: Option<String>,
    start: Option<String>,
    end: Option<String>,
    span: Option<String>,
    indicators: Option<String>,
    top_n: Option<usize>,
}

pub async fn get_averages(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<AveragesQuery>,
) -> Result<Json<AveragesResponse>, AppError> {
    let request = AveragesRequest {
        symbol: required(params.symbol, "symbol")?,
        timeframe: or_default(params.timeframe, DEFAULT_TIMEFRAME),
        exchange: or_default(params.exchange, DEFAULT_EXCHANGE),
        range: resolve_range(
            params.start.as_deref(),
            params.end.as_deref(),
            &or_default(params.span, "1d"),
        )?,
        indicators: AverageIndicator::parse_list(params.indicators.as_deref())?,
        top_n: averages::validate_top_n(params.top_n.unwrap_or(averages::DEFAULT_TOP_N))?,
    };

    Ok(Json(state.averages().execute(&request).await?))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    symbol: Option<String>,
    exchange: Option<String>,
    start: Option<String>,
    end: Option<String>,
    span: Option<String>,
    max_points: Option<usize>,
    timeframe: Option<String>,
}

pub async fn get_chart(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let request = ChartRequest {
        symbol: required(params.symbol, "symbol")?,
        exchange: or_default(params.exchange, DEFAULT_EXCHANGE),
        range: resolve_range(
            params.start.as_deref(),
            params.end.as_deref(),
            &or_default(params.span, "24h"),
        )?,
        max_points: chart::validate_max_points(
            params.max_points.unwrap_or(chart::DEFAULT_MAX_POINTS),
        )?,
        preferred_timeframe: params
            .timeframe
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
    };

    Ok(Json(state.charts().execute(&request).await?))
}

#[derive(Debug, Deserialize)]
pub struct TimeframesQuery {
    symbol: Option<String>,
    exchange: Option<String>,
    span: Option<String>,
    max_points: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TimeframesResponse {
    pub symbol: String,
    pub exchange: String,
    pub span: String,
    pub max_points: usize,
    pub available_timeframes: Vec<TimeframeInfo>,
    pub recommended_timeframe: &'static str,
}

pub async fn get_chart_timeframes(
    ValidQuery(params): ValidQuery<TimeframesQuery>,
) -> Result<Json<TimeframesResponse>, AppError> {
    let symbol = required(params.symbol, "symbol")?;
    let span = or_default(params.span, "24h");
    let max_points =
        chart::validate_max_points(params.max_points.unwrap_or(chart::DEFAULT_MAX_POINTS))?;
    let range = resolve_range(None, None, &span)?;

    let available = chart::available_timeframes(range.duration_seconds(), max_points);
    let recommended = available
        .iter()
        .find(|tf| tf.recommended)
        .map(|tf| tf.timeframe)
        .unwrap_or(DEFAULT_TIMEFRAME);

    Ok(Json(TimeframesResponse {
        symbol,
        exchange: or_default(params.exchange, DEFAULT_EXCHANGE),
        span,
        max_points,
        available_timeframes: available,
        recommended_timeframe: recommended,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    symbol: Option<String>,
    timeframe: Option<String>,
    exchange: Option<String>,
    capital: Option<f64>,
    risk_profile: Option<String>,
    side: Option<String>,
}

pub async fn get_movements(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<MovementsQuery>,
) -> Result<Json<MovementsResponse>, AppError> {
    let capital = params.capital.unwrap_or(DEFAULT_CAPITAL);
    if !capital.is_finite() || capital < 0.0 {
        return Err(AppError::BadRequest(
            "capital must be a non-negative number".to_string(),
        ));
    }

    let request = MovementsRequest {
        symbol: required(params.symbol, "symbol")?,
        timeframe: or_default(params.timeframe, DEFAULT_TIMEFRAME),
        exchange: or_default(params.exchange, DEFAULT_EXCHANGE),
        capital,
        risk_profile: or_default(params.risk_profile, "medium").parse::<RiskProfile>()?,
        side: or_default(params.side, "both").parse::<Side>()?,
    };

    let response = state.movements().execute(&request).await?;
    state.metrics.record_signal(response.signal);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct DominanceQuery {
    coins: Option<String>,
    exchange: Option<String>,
    timeframe: Option<String>,
    limit: Option<usize>,
}

/// Per-coin pipeline result; failures are reported inline
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CoinAnalysis {
    Metrics(Box<MetricsPayload>),
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct DominanceResponse {
    pub dominance: OrderedMap<String, f64>,
    pub analysis: OrderedMap<String, CoinAnalysis>,
}

pub async fn get_dominance(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DominanceQuery>,
) -> Result<Json<DominanceResponse>, AppError> {
    let coins: Vec<String> = or_default(params.coins, "btc,eth")
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();
    let exchange = or_default(params.exchange, DEFAULT_EXCHANGE);
    let timeframe = or_default(params.timeframe, "daily");
    let limit = params.limit.unwrap_or(DEFAULT_CANDLES_LIMIT);

    let dominance = state.dominance.fetch(&coins).await?;

    let controller = state.controller();
    let results = join_all(coins.iter().map(|coin| {
        let controller = controller.clone();
        let pair = format!("{}/USDT", canonical_coin(coin).to_uppercase());
        let exchange = exchange.clone();
        let timeframe = timeframe.clone();
        async move {
            controller
                .process_symbol(&exchange, &pair, &timeframe, limit)
                .await
        }
    }))
    .await;

    let analysis = coins
        .iter()
        .cloned()
        .zip(results)
        .map(|(coin, result)| {
            let analysis = match result {
                Ok(payload) => {
                    state.metrics.record_signal(payload.signals.signal);
                    CoinAnalysis::Metrics(Box::new(payload))
                }
                Err(e) => CoinAnalysis::Failed {
                    error: e.to_string(),
                },
            };
            (coin, analysis)
        })
        .collect();

    Ok(Json(DominanceResponse {
        dominance,
        analysis,
    }))
}
