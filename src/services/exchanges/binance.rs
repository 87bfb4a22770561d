//! Binance spot klines

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{build_url, ensure_success, parse_rows, MAX_LIMIT};
use crate::models::candle::CandleSeries;
use crate::models::timeframe;
use crate::services::market_data::{market_id, MarketDataError, MarketDataProvider};

const EXCHANGE: &str = "binance";
const KLINES_PATH: &str = "/api/v3/klines";

/// Binance REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// Binance uses the same interval codes as the timeframe table
fn interval(timeframe: &str) -> Result<&'static str, MarketDataError> {
    timeframe::lookup(timeframe)
        .map(|spec| spec.code)
        .ok_or_else(|| MarketDataError::UnsupportedTimeframe {
            exchange: EXCHANGE.to_string(),
            timeframe: timeframe.to_string(),
        })
}

#[async_trait]
impl MarketDataProvider for BinanceClient {
    fn exchange(&self) -> &str {
        EXCHANGE
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        let interval = interval(timeframe)?;
        let url = build_url(
            &self.base_url,
            KLINES_PATH,
            &[
                ("symbol", market_id(symbol)?),
                ("interval", interval.to_string()),
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
        let response = ensure_success(EXCHANGE, response).await?;

        let rows: Vec<Vec<Value>> = response.json().await.map_err(|e| MarketDataError::Decode {
            exchange: EXCHANGE.to_string(),
            message: e.to_string(),
        })?;

        Ok(CandleSeries::new(parse_rows(EXCHANGE, &rows)?))
    }
}
