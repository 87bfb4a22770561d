//! Unit tests for range averages and rebound detection

use std::sync::Arc;

use chrono::Duration;
use cryptometrics::common::time::TimeRange;
use cryptometrics::services::averages::*;
use cryptometrics::services::MarketDataService;
use cryptometrics::AppError;
use serde_json::Value;

use crate::fixtures::{base_time, candles_from_closes, StubProvider};

#[test]
fn test_parse_list_defaults_and_dedupes() {
    assert_eq!(AverageIndicator::parse_list(None).unwrap().len(), 11);
    assert_eq!(AverageIndicator::parse_list(Some(" , ")).unwrap().len(), 11);
    assert_eq!(
        AverageIndicator::parse_list(Some("close, RSI ,close")).unwrap(),
        vec![AverageIndicator::Close, AverageIndicator::Rsi]
    );
}

#[test]
fn test_parse_list_reports_unknown_names() {
    match AverageIndicator::parse_list(Some("close,foo,bar")) {
        Err(AppError::BadRequest(msg)) => {
            assert!(msg.contains("foo"));
            assert!(msg.contains("bar"));
        }
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[test]
fn test_validate_top_n() {
    assert_eq!(validate_top_n(1).unwrap(), 1);
    assert_eq!(validate_top_n(100).unwrap(), 100);
    assert!(validate_top_n(0).is_err());
    assert!(validate_top_n(101).is_err());
}

#[test]
fn test_compute_statistics() {
    let candles = candles_from_closes(&[100.0, 110.0, 104.5, 104.5]);
    let (averages, rebound) = compute(&candles, &AverageIndicator::ALL, 2).unwrap();

    let scalar = |i: AverageIndicator| match averages.get(&i) {
        Some(AverageValue::Scalar(v)) => *v,
        other => panic!("expected scalar for {:?}, got {:?}", i, other),
    };

    assert_eq!(scalar(AverageIndicator::Close), Some(104.75));
    assert_eq!(scalar(AverageIndicator::Volume), Some(1001.5));
    assert_eq!(scalar(AverageIndicator::Rsi), None);
    assert_eq!(scalar(AverageIndicator::HighestPrice), Some(110.5));
    assert_eq!(scalar(AverageIndicator::LowestPrice), Some(99.5));
    assert_eq!(scalar(AverageIndicator::AvgPrice), Some(104.1875));
    assert_eq!(scalar(AverageIndicator::AvgHigh), Some(110.5));
    assert_eq!(
        averages.get(&AverageIndicator::LowestPrices),
        Some(&AverageValue::List(vec![99.5, 99.5]))
    );

    assert_eq!(rebound.kind, ReboundType::Bullish);
    assert_eq!(rebound.move_pct, 10.0);
    assert_eq!(rebound.date, (base_time() + Duration::hours(1)).to_rfc3339());
}

#[test]
fn test_major_rebound_bearish() {
    let rebound = major_rebound(&candles_from_closes(&[100.0, 101.0, 90.0, 91.0])).unwrap();
    assert_eq!(rebound.kind, ReboundType::Bearish);
    assert_eq!(rebound.move_pct, 10.89);
}

#[test]
fn test_major_rebound_keeps_first_of_equal_moves() {
    // +50% and -50% tie
    let rebound = major_rebound(&candles_from_closes(&[100.0, 150.0, 75.0])).unwrap();
    assert_eq!(rebound.kind, ReboundType::Bullish);
    assert_eq!(rebound.move_pct, 50.0);
    assert_eq!(rebound.date, (base_time() + Duration::hours(1)).to_rfc3339());

    // the first and last moves are both +100%
    let rebound = major_rebound(&candles_from_closes(&[100.0, 200.0, 100.0, 200.0])).unwrap();
    assert_eq!(rebound.move_pct, 100.0);
    assert_eq!(rebound.date, (base_time() + Duration::hours(1)).to_rfc3339());
}

#[test]
fn test_compute_needs_two_candles() {
    let candles = candles_from_closes(&[100.0]);
    assert!(matches!(
        compute(&candles, &AverageIndicator::ALL, 10),
        Err(AppError::InsufficientData(_))
    ));
}

#[test]
fn test_output_keeps_requested_order() {
    let candles = candles_from_closes(&[100.0, 101.0, 102.0]);
    let requested = vec![AverageIndicator::Volume, AverageIndicator::Close];
    let (averages, _) = compute(&candles, &requested, 10).unwrap();

    let json = serde_json::to_string(&averages).unwrap();
    assert!(json.find("volume").unwrap() < json.find("close").unwrap());

    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_execute_filters_to_range() {
    let provider = StubProvider::new("binance").with_series(
        "1h",
        candles_from_closes(&[100.0, 100.0, 120.0, 121.0, 122.0, 200.0]),
    );
    let service = AveragesService::new(MarketDataService::default().with_provider(Arc::new(provider)));

    let request = AveragesRequest {
        symbol: "BTC/USDT".to_string(),
        timeframe: "1h".to_string(),
        exchange: "binance".to_string(),
        range: TimeRange {
            start: base_time() + Duration::hours(2),
            end: base_time() + Duration::hours(4),
        },
        indicators: vec![AverageIndicator::Close],
        top_n: 10,
    };

    let response = service.execute(&request).await.unwrap();
    assert_eq!(
        response.averages.get(&AverageIndicator::Close),
        Some(&AverageValue::Scalar(Some(121.0)))
    );
    // the 20% jump into the range and the spike after it are excluded
    assert_eq!(response.major_rebound.move_pct, 0.83);
}
