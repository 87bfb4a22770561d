//! Fetch -> indicators -> rules for a single symbol

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::indicators::IndicatorsService;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::RuleEvaluation;
use crate::models::timeframe::resolve_alias;
use crate::services::market_data::MarketDataService;
use crate::signals::rules::RulesService;

pub const DEFAULT_CANDLES_LIMIT: usize = 500;

/// Response of the metrics endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsPayload {
    pub exchange: String,
    pub symbol: String,
    /// As requested by the caller, before alias resolution
    pub timeframe: String,
    pub timestamp: String,
    pub indicators: IndicatorSnapshot,
    pub signals: RuleEvaluation,
}

#[derive(Clone)]
pub struct MetricsController {
    market: MarketDataService,
}

impl MetricsController {
    pub fn new(market: MarketDataService) -> Self {
        Self { market }
    }

    pub async fn process_symbol(
        &self,
        exchange: &str,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<MetricsPayload, AppError> {
        let exchange = exchange.trim().to_lowercase();
        let resolved = resolve_alias(timeframe);

        let candles = self
            .market
            .get_ohlcv(&exchange, symbol, &resolved, limit)
            .await?;
        let indicators = IndicatorsService::calculate_all(&candles);
        let signals = RulesService::new(symbol)?.evaluate(&indicators);

        info!(
            exchange = %exchange,
            symbol = %symbol,
            timeframe = %resolved,
            signal = signals.signal.as_str(),
            entry_votes = signals.entry_votes,
            exit_votes = signals.exit_votes,
            "Evaluated {}",
            symbol
        );

        Ok(MetricsPayload {
            exchange,
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            indicators,
            signals,
        })
    }
}
