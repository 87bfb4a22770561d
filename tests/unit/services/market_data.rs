//! Unit tests for symbol conversion and the exchange registry

use std::sync::Arc;

use cryptometrics::services::market_data::market_id;
use cryptometrics::services::{MarketDataError, MarketDataService};

use crate::fixtures::{uptrend, StubProvider};

#[test]
fn test_market_id() {
    assert_eq!(market_id("BTC/USDT").unwrap(), "BTCUSDT");
    assert_eq!(market_id(" eth/usdt ").unwrap(), "ETHUSDT");
    assert_eq!(market_id("SOLUSDT").unwrap(), "SOLUSDT");

    for bad in ["", "BTC/", "/USDT", "BTC/USDT/X", "BTC-USDT"] {
        let err = market_id(bad).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidSymbol(_)), "{:?}", bad);
        assert!(err.is_client_error());
    }
}

#[test]
fn test_registry_is_case_insensitive() {
    let service = MarketDataService::default()
        .with_provider(Arc::new(StubProvider::new("binance").with_series("1h", uptrend(5))));

    assert!(service.provider("Binance").is_ok());
    assert!(service.provider("BINANCE").is_ok());

    let err = service.provider("kraken").err().unwrap();
    assert!(matches!(err, MarketDataError::UnsupportedExchange(_)));
    assert!(err.is_client_error());
}

#[test]
fn test_get_ohlcv_through_registry() {
    let service = MarketDataService::default()
        .with_provider(Arc::new(StubProvider::new("binance").with_series("1h", uptrend(50))));

    let candles = tokio_test::block_on(service.get_ohlcv("binance", "BTC/USDT", "1h", 20)).unwrap();
    assert_eq!(candles.len(), 20);
    assert_eq!(candles.last().unwrap().close, 149.0);

    let err = tokio_test::block_on(service.get_ohlcv("binance", "BTC/USDT", "4h", 20)).unwrap_err();
    assert!(!err.is_client_error());
}

#[test]
fn test_candle_series_sorts_and_dedupes() {
    use chrono::Duration;
    use cryptometrics::models::candle::{Candle, CandleSeries};

    let t0 = crate::fixtures::base_time();
    let series = CandleSeries::new(vec![
        Candle::new(1.0, 1.0, 1.0, 2.0, 1.0, t0 + Duration::hours(1)),
        Candle::new(1.0, 1.0, 1.0, 1.0, 1.0, t0),
        Candle::new(1.0, 1.0, 1.0, 3.0, 1.0, t0 + Duration::hours(1)),
    ]);
    assert_eq!(series.len(), 2);
    assert_eq!(series.closes(), vec![1.0, 3.0]);
}
