//! Chart-ready OHLCV series with automatic timeframe selection.

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::math;
use crate::common::time::TimeRange;
use crate::error::AppError;
use crate::models::candle::CandleSeries;
use crate::models::timeframe::{self, TimeframeSpec, TIMEFRAMES};
use crate::services::market_data::{market_id, MarketDataService};

pub const DEFAULT_MAX_POINTS: usize = 1000;
pub const MIN_MAX_POINTS: usize = 50;
pub const MAX_MAX_POINTS: usize = 5000;
/// Fewest in-range candles a timeframe must yield to be used
pub const MIN_CHART_CANDLES: usize = 10;
/// Below this many candles a chart is considered too sparse
const SPARSE_CANDLES: f64 = 50.0;

/// `max_points` must lie in `50..=5000`
pub fn validate_max_points(max_points: usize) -> Result<usize, AppError> {
    if (MIN_MAX_POINTS..=MAX_MAX_POINTS).contains(&max_points) {
        Ok(max_points)
    } else {
        Err(AppError::BadRequest(format!(
            "max_points must be between {} and {}, got {}",
            MIN_MAX_POINTS, MAX_MAX_POINTS, max_points
        )))
    }
}

/// Pick the timeframe whose candle count best fits `max_points`.
///
/// A preferred timeframe from the table always wins.
pub fn determine_optimal_timeframe(
    duration_seconds: f64,
    max_points: usize,
    preferred: Option<&str>,
) -> &'static TimeframeSpec {
    if let Some(spec) = preferred.and_then(timeframe::lookup) {
        return spec;
    }

    let max_points = max_points as f64;
    let mut best = timeframe::lookup("1h").unwrap_or(&TIMEFRAMES[5]);
    let mut best_score = f64::INFINITY;

    for spec in TIMEFRAMES.iter() {
        let estimated = duration_seconds / spec.seconds as f64;
        let actual = estimated.min(spec.max_candles as f64);
        let priority = spec.priority as f64;

        let score = if actual > max_points {
            (actual - max_points).abs() + priority * 10.0
        } else if actual < SPARSE_CANDLES {
            (SPARSE_CANDLES - actual).abs() + priority * 5.0
        } else {
            priority
        };

        if score < best_score {
            best_score = score;
            best = spec;
        }
    }

    best
}

/// `optimal` first, then the rest by priority distance (table order on ties)
pub fn fallback_order(optimal: &TimeframeSpec) -> Vec<&'static TimeframeSpec> {
    let mut order: Vec<&'static TimeframeSpec> = TIMEFRAMES.iter().collect();
    order.sort_by_key(|spec| (spec.priority as i64 - optimal.priority as i64).abs());

    let mut result = Vec::with_capacity(order.len());
    if let Some(spec) = timeframe::lookup(optimal.code) {
        result.push(spec);
    }
    result.extend(order.into_iter().filter(|spec| spec.code != optimal.code));
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataDensity {
    High,
    Optimal,
    Moderate,
    Low,
}

pub fn data_density(candles: usize, max_points: usize) -> DataDensity {
    let candles = candles as f64;
    let max_points = max_points as f64;
    if candles > max_points {
        DataDensity::High
    } else if candles > max_points * 0.7 {
        DataDensity::Optimal
    } else if candles > SPARSE_CANDLES {
        DataDensity::Moderate
    } else {
        DataDensity::Low
    }
}

pub fn optimization_reason(optimal: &str, actual: &str) -> String {
    if optimal == actual {
        format!("Optimal timeframe {} selected automatically", actual)
    } else {
        format!(
            "Fell back from {} to {} due to data availability",
            optimal, actual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeframeFit {
    Optimal,
    Suboptimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeInfo {
    pub timeframe: &'static str,
    pub candle_duration: String,
    pub estimated_candles: usize,
    pub density: TimeframeFit,
    pub recommended: bool,
}

/// Every timeframe in priority order with its expected candle count
pub fn available_timeframes(duration_seconds: f64, max_points: usize) -> Vec<TimeframeInfo> {
    let recommended = determine_optimal_timeframe(duration_seconds, max_points, None);

    TIMEFRAMES
        .iter()
        .map(|spec| {
            let estimated = duration_seconds / spec.seconds as f64;
            let hours = spec.seconds as f64 / 3600.0;
            let candle_duration = if hours >= 1.0 {
                format!("{:.1}h", hours)
            } else {
                format!("{}m", spec.seconds / 60)
            };

            TimeframeInfo {
                timeframe: spec.code,
                candle_duration,
                estimated_candles: (estimated.max(0.0).floor() as usize).min(spec.max_candles),
                density: if estimated >= SPARSE_CANDLES && estimated <= max_points as f64 {
                    TimeframeFit::Optimal
                } else {
                    TimeframeFit::Suboptimal
                },
                recommended: spec.code == recommended.code,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Milliseconds since the epoch
    pub timestamp: i64,
    pub datetime: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRange {
    pub highest: f64,
    pub lowest: f64,
    pub range_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeStats {
    pub total: f64,
    pub average: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub start_price: f64,
    pub end_price: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityStats {
    pub daily_returns_std: Option<f64>,
    pub price_volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMetrics {
    pub price_range: PriceRange,
    pub volume: VolumeStats,
    pub price_change: PriceChange,
    pub volatility: VolatilityStats,
}

/// Summary statistics, `None` for an empty series
pub fn chart_metrics(candles: &CandleSeries) -> Option<ChartMetrics> {
    let first = candles.first()?;
    let last = candles.last()?;

    let highest = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let volumes = candles.volumes();
    let total_volume: f64 = volumes.iter().sum();
    let returns = math::pct_changes(&candles.closes());
    let ranges: Vec<f64> = candles
        .iter()
        .map(|c| (c.high - c.low) / c.close * 100.0)
        .collect();

    Some(ChartMetrics {
        price_range: PriceRange {
            highest,
            lowest,
            range_pct: math::round_to((highest - lowest) / lowest * 100.0, 2),
        },
        volume: VolumeStats {
            total: total_volume,
            average: total_volume / volumes.len() as f64,
            max: volumes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        },
        price_change: PriceChange {
            start_price: first.close,
            end_price: last.close,
            change_pct: math::round_to((last.close - first.close) / first.close * 100.0, 2),
        },
        volatility: VolatilityStats {
            daily_returns_std: math::sample_std_dev(&returns)
                .and_then(math::finite)
                .map(|v| math::round_to(v, 3)),
            price_volatility: math::mean(&ranges)
                .and_then(math::finite)
                .map(|v| math::round_to(v, 2)),
        },
    })
}

pub fn chart_points(candles: &CandleSeries) -> Vec<ChartPoint> {
    candles
        .iter()
        .map(|c| ChartPoint {
            timestamp: c.timestamp.timestamp_millis(),
            datetime: c.timestamp.to_rfc3339(),
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub symbol: String,
    pub exchange: String,
    pub range: TimeRange,
    pub max_points: usize,
    pub preferred_timeframe: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Optimization {
    pub optimal_timeframe: &'static str,
    pub reason: String,
    pub data_density: DataDensity,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub symbol: String,
    pub exchange: String,
    pub timeframe: &'static str,
    pub start: String,
    pub end: String,
    pub duration_hours: f64,
    pub total_candles: usize,
    pub chart_data: Vec<ChartPoint>,
    pub metrics: Option<ChartMetrics>,
    pub optimization: Optimization,
}

#[derive(Clone)]
pub struct ChartService {
    market: MarketDataService,
}

impl ChartService {
    pub fn new(market: MarketDataService) -> Self {
        Self { market }
    }

    pub async fn execute(&self, request: &ChartRequest) -> Result<ChartResponse, AppError> {
        // Reject bad input before the fallback loop
        self.market.provider(&request.exchange)?;
        market_id(&request.symbol)?;

        let duration = request.range.duration_seconds();
        let optimal = determine_optimal_timeframe(
            duration,
            request.max_points,
            request.preferred_timeframe.as_deref(),
        );

        let (candles, actual) = self.fetch_with_fallback(request, optimal).await?;

        Ok(ChartResponse {
            symbol: request.symbol.clone(),
            exchange: request.exchange.clone(),
            timeframe: actual.code,
            start: request.range.start.to_rfc3339(),
            end: request.range.end.to_rfc3339(),
            duration_hours: math::round_to(duration / 3600.0, 1),
            total_candles: candles.len(),
            chart_data: chart_points(&candles),
            metrics: chart_metrics(&candles),
            optimization: Optimization {
                optimal_timeframe: optimal.code,
                reason: optimization_reason(optimal.code, actual.code),
                data_density: data_density(candles.len(), request.max_points),
            },
        })
    }

    /// Try timeframes nearest to `optimal` until one has enough candles in range
    async fn fetch_with_fallback(
        &self,
        request: &ChartRequest,
        optimal: &'static TimeframeSpec,
    ) -> Result<(CandleSeries, &'static TimeframeSpec), AppError> {
        for spec in fallback_order(optimal) {
            let fetched = self
                .market
                .get_ohlcv(&request.exchange, &request.symbol, spec.code, spec.max_candles)
                .await;

            match fetched {
                Ok(candles) => {
                    let in_range = candles.between(&request.range);
                    if in_range.len() >= MIN_CHART_CANDLES {
                        return Ok((in_range, spec));
                    }
                    debug!(
                        timeframe = spec.code,
                        in_range = in_range.len(),
                        "Too few candles in range, trying next timeframe"
                    );
                }
                Err(e) => {
                    warn!(timeframe = spec.code, error = %e, "Chart fetch failed, trying next timeframe");
                }
            }
        }

        Err(AppError::NotFound(format!(
            "Could not get chart data for {} on {}",
            request.symbol, request.exchange
        )))
    }
}
