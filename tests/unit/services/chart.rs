//! Unit tests for timeframe selection and chart assembly

use std::sync::Arc;

use chrono::Duration;
use cryptometrics::common::time::TimeRange;
use cryptometrics::models::timeframe;
use cryptometrics::services::chart::*;
use cryptometrics::services::MarketDataService;
use cryptometrics::AppError;

use crate::fixtures::{base_time, candles_from_closes, spaced, StubProvider};

const DAY: f64 = 86_400.0;

#[test]
fn test_optimal_timeframe_for_a_day() {
    // 1m is capped at 1000 candles, which fits max_points exactly
    assert_eq!(determine_optimal_timeframe(DAY, 1000, None).code, "1m");
}

#[test]
fn test_optimal_timeframe_for_a_week_with_fewer_points() {
    assert_eq!(determine_optimal_timeframe(7.0 * DAY, 500, None).code, "30m");
}

#[test]
fn test_optimal_timeframe_for_empty_range() {
    assert_eq!(determine_optimal_timeframe(0.0, 1000, None).code, "1m");
}

#[test]
fn test_preferred_timeframe_wins_when_known() {
    assert_eq!(determine_optimal_timeframe(DAY, 1000, Some("4h")).code, "4h");
    assert_eq!(determine_optimal_timeframe(DAY, 1000, Some("1M")).code, "1M");
    assert_eq!(determine_optimal_timeframe(DAY, 1000, Some("2x")).code, "1m");
}

#[test]
fn test_fallback_order() {
    let optimal = timeframe::lookup("1h").unwrap();
    let order: Vec<&str> = fallback_order(optimal).iter().map(|s| s.code).collect();
    assert_eq!(order.len(), 15);
    assert_eq!(&order[..5], &["1h", "30m", "2h", "15m", "4h"]);
    assert_eq!(order[14], "1M");
}

#[test]
fn test_data_density() {
    assert_eq!(data_density(1001, 1000), DataDensity::High);
    assert_eq!(data_density(800, 1000), DataDensity::Optimal);
    assert_eq!(data_density(700, 1000), DataDensity::Moderate);
    assert_eq!(data_density(51, 1000), DataDensity::Moderate);
    assert_eq!(data_density(50, 1000), DataDensity::Low);
}

#[test]
fn test_validate_max_points() {
    assert!(validate_max_points(50).is_ok());
    assert!(validate_max_points(5000).is_ok());
    assert!(validate_max_points(49).is_err());
    assert!(validate_max_points(5001).is_err());
}

#[test]
fn test_available_timeframes_listing() {
    let list = available_timeframes(DAY, 1000);
    assert_eq!(list.len(), 15);

    let one_minute = &list[0];
    assert_eq!(one_minute.timeframe, "1m");
    assert_eq!(one_minute.candle_duration, "1m");
    assert_eq!(one_minute.estimated_candles, 1000);
    assert_eq!(one_minute.density, TimeframeFit::Suboptimal);
    assert!(one_minute.recommended);

    let five_minutes = list.iter().find(|t| t.timeframe == "5m").unwrap();
    assert_eq!(five_minutes.estimated_candles, 288);
    assert_eq!(five_minutes.density, TimeframeFit::Optimal);
    assert!(!five_minutes.recommended);

    let hour = list.iter().find(|t| t.timeframe == "1h").unwrap();
    assert_eq!(hour.candle_duration, "1.0h");
    assert_eq!(hour.estimated_candles, 24);

    assert_eq!(list[14].candle_duration, "720.0h");
    assert_eq!(list.iter().filter(|t| t.recommended).count(), 1);
}

#[test]
fn test_chart_metrics() {
    let candles = candles_from_closes(&[100.0, 110.0, 99.0]);
    let metrics = chart_metrics(&candles).unwrap();

    assert_eq!(metrics.price_range.highest, 110.5);
    assert_eq!(metrics.price_range.lowest, 98.5);
    assert_eq!(metrics.price_range.range_pct, 12.18);
    assert_eq!(metrics.volume.total, 3003.0);
    assert_eq!(metrics.volume.average, 1001.0);
    assert_eq!(metrics.volume.max, 1002.0);
    assert_eq!(metrics.price_change.start_price, 100.0);
    assert_eq!(metrics.price_change.end_price, 99.0);
    assert_eq!(metrics.price_change.change_pct, -1.0);
    assert_eq!(metrics.volatility.daily_returns_std, Some(14.142));
    assert!(metrics.volatility.price_volatility.unwrap() > 0.0);

    assert!(chart_metrics(&candles_from_closes(&[])).is_none());
}

#[test]
fn test_chart_points() {
    let points = chart_points(&candles_from_closes(&[100.0]));
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].timestamp, base_time().timestamp_millis());
    assert_eq!(points[0].datetime, base_time().to_rfc3339());
    assert_eq!(points[0].close, 100.0);
}

fn day_range() -> TimeRange {
    TimeRange {
        start: base_time(),
        end: base_time() + Duration::hours(24),
    }
}

fn request(max_points: usize, preferred: Option<&str>) -> ChartRequest {
    ChartRequest {
        symbol: "BTC/USDT".to_string(),
        exchange: "binance".to_string(),
        range: day_range(),
        max_points,
        preferred_timeframe: preferred.map(str::to_string),
    }
}

#[tokio::test]
async fn test_execute_falls_back_until_enough_candles() {
    // 1m is missing and 3m only has a handful of rows in range
    let provider = StubProvider::new("binance")
        .with_series("3m", spaced(base_time(), Duration::minutes(3), 5))
        .with_series("5m", spaced(base_time(), Duration::minutes(5), 40));
    let service = ChartService::new(MarketDataService::default().with_provider(Arc::new(provider)));

    let response = service.execute(&request(1000, None)).await.unwrap();

    assert_eq!(response.timeframe, "5m");
    assert_eq!(response.total_candles, 40);
    assert_eq!(response.chart_data.len(), 40);
    assert_eq!(response.duration_hours, 24.0);
    assert_eq!(response.optimization.optimal_timeframe, "1m");
    assert_eq!(
        response.optimization.reason,
        "Fell back from 1m to 5m due to data availability"
    );
    assert_eq!(response.optimization.data_density, DataDensity::Low);
    assert!(response.metrics.is_some());
}

#[tokio::test]
async fn test_execute_with_preferred_timeframe() {
    let provider = StubProvider::new("binance")
        .with_series("1h", spaced(base_time() - Duration::hours(10), Duration::hours(1), 40));
    let service = ChartService::new(MarketDataService::default().with_provider(Arc::new(provider)));

    let response = service.execute(&request(1000, Some("1h"))).await.unwrap();
    assert_eq!(response.timeframe, "1h");
    // rows before the range start are dropped
    assert_eq!(response.total_candles, 25);
    assert_eq!(
        response.optimization.reason,
        "Optimal timeframe 1h selected automatically"
    );
}

#[tokio::test]
async fn test_execute_without_data_is_not_found() {
    let service = ChartService::new(
        MarketDataService::default().with_provider(Arc::new(StubProvider::new("binance"))),
    );
    let err = service.execute(&request(1000, None)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_execute_rejects_unknown_exchange() {
    let service = ChartService::new(MarketDataService::default());
    let err = service.execute(&request(1000, None)).await.unwrap_err();
    assert_eq!(err.status_code().as_u16(), 400);
}
