//! Public REST clients for the supported spot exchanges.

pub mod binance;
pub mod bitget;

pub use binance::BinanceClient;
pub use bitget::BitgetClient;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Response;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::models::candle::Candle;
use crate::services::market_data::MarketDataError;

/// Largest page either exchange returns for a single candle request
pub const MAX_LIMIT: usize = 1000;

/// Join `path` onto `base` and append the query parameters
pub(crate) fn build_url(
    base: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<Url, MarketDataError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse_with_params(&raw, params).map_err(|e| MarketDataError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Turn a non-2xx response into `MarketDataError::Api`
pub(crate) async fn ensure_success(
    exchange: &str,
    response: Response,
) -> Result<Response, MarketDataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(200).collect();
    warn!(exchange = %exchange, status = %status, "{} API returned {}: {}", exchange, status, body);
    Err(MarketDataError::Api {
        exchange: exchange.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Numbers arrive either as JSON strings or JSON numbers
pub(crate) fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

pub(crate) fn timestamp_from_ms(value: &Value) -> Option<DateTime<Utc>> {
    let ms = match value {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    Utc.timestamp_millis_opt(ms).single()
}

/// Parse `[ts_ms, open, high, low, close, volume, ...]` rows
pub(crate) fn parse_rows(exchange: &str, rows: &[Vec<Value>]) -> Result<Vec<Candle>, MarketDataError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let decode = |message: &str| MarketDataError::Decode {
                exchange: exchange.to_string(),
                message: format!("row {}: {}", i, message),
            };
            if row.len() < 6 {
                return Err(decode("expected at least 6 columns"));
            }
            let timestamp = timestamp_from_ms(&row[0]).ok_or_else(|| decode("invalid timestamp"))?;
            let field = |idx: usize, name: &str| {
                parse_number(&row[idx]).ok_or_else(|| decode(&format!("invalid {}", name)))
            };
            Ok(Candle::new(
                field(1, "open")?,
                field(2, "high")?,
                field(3, "low")?,
                field(4, "close")?,
                field(5, "volume")?,
                timestamp,
            ))
        })
        .collect()
}
