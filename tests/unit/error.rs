//! Unit tests for error to status mapping

use axum::response::IntoResponse;
use cryptometrics::services::MarketDataError;
use cryptometrics::signals::thresholds::ThresholdError;
use cryptometrics::AppError;

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::BadRequest("x".into()), 400),
        (AppError::NotFound("x".into()), 404),
        (AppError::InsufficientData("x".into()), 422),
        (AppError::ExternalApi("x".into()), 502),
        (AppError::Internal("x".into()), 500),
    ];
    for (error, status) in cases {
        assert_eq!(error.status_code().as_u16(), status, "{}", error);
    }
}

#[test]
fn test_market_data_errors() {
    let client = AppError::from(MarketDataError::UnsupportedExchange("kraken".into()));
    assert_eq!(client.status_code().as_u16(), 400);

    let client = AppError::from(MarketDataError::InvalidSymbol("BTC-?".into()));
    assert_eq!(client.status_code().as_u16(), 400);

    let upstream = AppError::from(MarketDataError::Api {
        exchange: "binance".into(),
        status: 500,
        body: "boom".into(),
    });
    assert_eq!(upstream.status_code().as_u16(), 502);
}

#[test]
fn test_threshold_error_is_internal() {
    let error = AppError::from(ThresholdError::InvalidValue {
        var: "RSI_OVERSOLD".into(),
        value: "low".into(),
    });
    assert_eq!(error.status_code().as_u16(), 500);
}

#[tokio::test]
async fn test_error_body() {
    let response = AppError::BadRequest("symbol is required".into()).into_response();
    assert_eq!(response.status().as_u16(), 400);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "symbol is required");
    assert_eq!(body["status"], 400);
}
