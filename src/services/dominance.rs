//! Market-cap dominance from the CoinGecko global endpoint.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::common::math;
use crate::common::OrderedMap;
use crate::config::UpstreamConfig;
use crate::error::AppError;
use crate::services::market_data::http_client;

const GLOBAL_PATH: &str = "/api/v3/global";

#[derive(Debug, Deserialize)]
struct GlobalResponse {
    #[serde(default)]
    data: GlobalData,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalData {
    #[serde(default)]
    market_cap_percentage: HashMap<String, f64>,
}

/// Ticker CoinGecko reports a coin's dominance under
pub fn canonical_coin(coin: &str) -> String {
    let coin = coin.trim().to_lowercase();
    match coin.as_str() {
        "bitcoin" => "btc".to_string(),
        "ethereum" => "eth".to_string(),
        "tether" => "usdt".to_string(),
        _ => coin,
    }
}

/// Percentages for the requested coins that CoinGecko reports, rounded to 2 dp
pub fn select_dominance(
    percentages: &HashMap<String, f64>,
    coins: &[String],
) -> OrderedMap<String, f64> {
    coins
        .iter()
        .map(|coin| canonical_coin(coin))
        .filter_map(|key| {
            percentages
                .get(&key)
                .map(|value| (key, math::round_to(*value, 2)))
        })
        .collect()
}

#[derive(Clone)]
pub struct DominanceService {
    client: Client,
    base_url: String,
}

impl DominanceService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(upstream: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(http_client(upstream)?, upstream.coingecko_url.clone()))
    }

    pub async fn fetch(&self, coins: &[String]) -> Result<OrderedMap<String, f64>, AppError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), GLOBAL_PATH);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("CoinGecko API returned {}: {}", status, snippet);
            return Err(AppError::ExternalApi(format!(
                "CoinGecko API returned {}",
                status
            )));
        }

        let body: GlobalResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid CoinGecko response: {}", e)))?;

        Ok(select_dominance(&body.data.market_cap_percentage, coins))
    }
}
