//! Market data provider interface and the exchange registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::models::candle::CandleSeries;
use crate::services::exchanges::{BinanceClient, BitgetClient};

pub const SUPPORTED_EXCHANGES: [&str; 2] = ["binance", "bitget"];

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Unsupported exchange: {0}")]
    UnsupportedExchange(String),

    #[error("Timeframe '{timeframe}' is not supported by {exchange}")]
    UnsupportedTimeframe { exchange: String, timeframe: String },

    #[error("Invalid symbol '{0}', expected BASE/QUOTE such as BTC/USDT")]
    InvalidSymbol(String),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("{exchange} request failed: {source}")]
    Http {
        exchange: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{exchange} API returned {status}: {body}")]
    Api {
        exchange: String,
        status: u16,
        body: String,
    },

    #[error("{exchange} response could not be decoded: {message}")]
    Decode { exchange: String, message: String },
}

impl MarketDataError {
    /// Errors caused by the caller's input rather than the upstream API
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MarketDataError::UnsupportedExchange(_)
                | MarketDataError::UnsupportedTimeframe { .. }
                | MarketDataError::InvalidSymbol(_)
        )
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Exchange name, lower case
    fn exchange(&self) -> &str;

    /// Get the most recent `limit` candles for a `BASE/QUOTE` symbol
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError>;
}

/// `BTC/USDT` -> `BTCUSDT`. Symbols without a slash are upper-cased as-is.
pub fn market_id(symbol: &str) -> Result<String, MarketDataError> {
    let symbol = symbol.trim();
    let invalid = || MarketDataError::InvalidSymbol(symbol.to_string());

    let id = match symbol.split_once('/') {
        Some((base, quote)) => {
            if base.is_empty() || quote.is_empty() || quote.contains('/') {
                return Err(invalid());
            }
            format!("{}{}", base, quote)
        }
        None => symbol.to_string(),
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(id.to_uppercase())
}

/// Shared upstream client carrying the configured timeout and user agent
pub fn http_client(upstream: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("cryptometrics/", env!("CARGO_PKG_VERSION")))
        .timeout(upstream.timeout)
        .build()
}

/// Looks up providers by exchange name and fetches candles through them.
#[derive(Clone, Default)]
pub struct MarketDataService {
    providers: HashMap<String, Arc<dyn MarketDataProvider>>,
}

impl MarketDataService {
    /// Registry with the public REST clients of every supported exchange
    pub fn from_config(upstream: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = http_client(upstream)?;

        Ok(Self::default()
            .with_provider(Arc::new(BinanceClient::new(
                client.clone(),
                upstream.binance_url.clone(),
            )))
            .with_provider(Arc::new(BitgetClient::new(client, upstream.bitget_url.clone()))))
    }

    /// Register a provider under its exchange name
    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.providers
            .insert(provider.exchange().to_lowercase(), provider);
        self
    }

    /// Provider for an exchange name (case-insensitive)
    pub fn provider(&self, exchange: &str) -> Result<Arc<dyn MarketDataProvider>, MarketDataError> {
        self.providers
            .get(&exchange.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| MarketDataError::UnsupportedExchange(exchange.to_string()))
    }

    pub async fn get_ohlcv(
        &self,
        exchange: &str,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<CandleSeries, MarketDataError> {
        let provider = self.provider(exchange)?;
        let candles = provider.fetch_ohlcv(symbol, timeframe, limit).await?;
        debug!(
            exchange = %provider.exchange(),
            symbol = %symbol,
            timeframe = %timeframe,
            count = candles.len(),
            "Fetched {} candles",
            candles.len()
        );
        Ok(candles)
    }
}
