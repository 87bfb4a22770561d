//! Bitget spot candles (v2 API)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{build_url, ensure_success, parse_rows, MAX_LIMIT};
use crate::models::candle::CandleSeries;
use crate::services::market_data::{market_id, MarketDataError, MarketDataProvider};

const EXCHANGE: &str = "bitget";
const CANDLES_PATH: &str = "/api/v2/spot/market/candles";
const SUCCESS_CODE: &str = "00000";

/// Response envelope shared by every Bitget v2 endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<Vec<Vec<Value>>>,
}

/// Bitget REST client.
#[derive(Clone)]
pub struct BitgetClient {
    client: Client,
    base_url: String,
}

impl BitgetClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// Spot granularity for a timeframe code. Bitget has no 2h or 8h candles.
pub fn granularity(timeframe: &str) -> Result<&'static str, MarketDataError> {
    let value = match timeframe {
        "1m" => "1min",
        "3m" => "3min",
        "5m" => "5min",
        "15m" => "15min",
        "30m" => "30min",
        "1h" => "1h",
        "4h" => "4h",
        "6h" => "6h",
        "12h" => "12h",
        "1d" => "1day",
        "3d" => "3day",
        "1w" => "1week",
        "1M" => "1M",
        _ => {
            return Err(MarketDataError::UnsupportedTimeframe {
                exchange: EXCHANGE.to_string(),
                timeframe: timeframe.to_string(),
            })
        }
    };
    Ok(value)
}

#[async_trait]
impl MarketDataProvider for BitgetClient {
    fn exchange(&self) -> &str {
        EXCHANGE
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        let granularity = granularity(timeframe)?;
        let url = build_url(
            &self.base_url,
            CANDLES_PATH,
            &[
                ("symbol", market_id(symbol)?),
                ("granularity", granularity.to_string()),
                ("limit", limit.clamp(1, MAX_LIMIT).to_string()),
            ],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| MarketDataError::Http {
                exchange: EXCHANGE.to_string(),
                source,
            })?;
        let status = response.status().as_u16();
        let response = ensure_success(EXCHANGE, response).await?;

        let envelope: Envelope = response.json().await.map_err(|e| MarketDataError::Decode {
            exchange: EXCHANGE.to_string(),
            message: e.to_string(),
        })?;

        if envelope.code != SUCCESS_CODE {
            return Err(MarketDataError::Api {
                exchange: EXCHANGE.to_string(),
                status,
                body: format!("{} {}", envelope.code, envelope.msg),
            });
        }

        let rows = envelope.data.unwrap_or_default();
        Ok(CandleSeries::new(parse_rows(EXCHANGE, &rows)?))
    }
}
