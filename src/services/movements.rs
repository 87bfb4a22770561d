//! Long/short trade plans derived from the rule vote.

use std::str::FromStr;

use serde::Serialize;

use crate::common::math;
use crate::error::AppError;
use crate::indicators::IndicatorsService;
use crate::models::signal::{RuleEvaluation, Signal};
use crate::services::market_data::MarketDataService;
use crate::signals::rules::RulesService;
use crate::signals::scoring::calculate_confidence;

pub const DEFAULT_CANDLES_LIMIT: usize = 500;
pub const DEFAULT_CAPITAL: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    /// `(target_pct, stop_pct)`
    pub fn percentages(&self) -> (f64, f64) {
        match self {
            RiskProfile::Low => (2.0, 1.0),
            RiskProfile::Medium => (4.0, 2.0),
            RiskProfile::High => (8.0, 4.0),
        }
    }
}

impl FromStr for RiskProfile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskProfile::Low),
            "medium" => Ok(RiskProfile::Medium),
            "high" => Ok(RiskProfile::High),
            other => Err(AppError::BadRequest(format!(
                "Unsupported risk profile '{}', expected low, medium or high",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
    Both,
}

impl Side {
    pub fn includes_long(&self) -> bool {
        matches!(self, Side::Long | Side::Both)
    }

    pub fn includes_short(&self) -> bool {
        matches!(self, Side::Short | Side::Both)
    }
}

impl FromStr for Side {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            "both" => Ok(Side::Both),
            other => Err(AppError::BadRequest(format!(
                "Unsupported side '{}', expected long, short or both",
                other
            ))),
        }
    }
}

/// Entry, target and stop for one side of the market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionPlan {
    pub entry: f64,
    pub target_pct: f64,
    pub target: f64,
    pub stop_pct: f64,
    pub stop_loss: f64,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

pub fn build_long(price: f64, profile: RiskProfile, rules: &RuleEvaluation) -> PositionPlan {
    let (target_pct, stop_pct) = profile.percentages();
    PositionPlan {
        entry: math::round_to(price, 2),
        target_pct,
        target: math::round_to(price * (1.0 + target_pct / 100.0), 2),
        stop_pct,
        stop_loss: math::round_to(price * (1.0 - stop_pct / 100.0), 2),
        confidence: calculate_confidence(rules.entry_votes, rules.exit_votes),
        reasons: rules.explain_entry.clone(),
    }
}

/// Mirror of [`build_long`]: exit votes support the short
pub fn build_short(price: f64, profile: RiskProfile, rules: &RuleEvaluation) -> PositionPlan {
    let (target_pct, stop_pct) = profile.percentages();
    PositionPlan {
        entry: math::round_to(price, 2),
        target_pct,
        target: math::round_to(price * (1.0 - target_pct / 100.0), 2),
        stop_pct,
        stop_loss: math::round_to(price * (1.0 + stop_pct / 100.0), 2),
        confidence: calculate_confidence(rules.exit_votes, rules.entry_votes),
        reasons: rules.explain_exit.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct MovementsRequest {
    pub symbol: String,
    pub timeframe: String,
    pub exchange: String,
    pub capital: f64,
    pub risk_profile: RiskProfile,
    pub side: Side,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementsResponse {
    pub symbol: String,
    pub timeframe: String,
    pub risk_profile: RiskProfile,
    pub capital: f64,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<PositionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<PositionPlan>,
}

#[derive(Clone)]
pub struct MovementsService {
    market: MarketDataService,
}

impl MovementsService {
    pub fn new(market: MarketDataService) -> Self {
        Self { market }
    }

    pub async fn execute(&self, request: &MovementsRequest) -> Result<MovementsResponse, AppError> {
        let candles = self
            .market
            .get_ohlcv(
                &request.exchange,
                &request.symbol,
                &request.timeframe,
                DEFAULT_CANDLES_LIMIT,
            )
            .await?;

        let price = candles.last().map(|c| c.close).ok_or_else(|| {
            AppError::InsufficientData(format!("No candles returned for {}", request.symbol))
        })?;

        let indicators = IndicatorsService::calculate_all(&candles);
        let rules = RulesService::new(&request.symbol)?.evaluate(&indicators);

        Ok(MovementsResponse {
            symbol: request.symbol.clone(),
            timeframe: request.timeframe.clone(),
            risk_profile: request.risk_profile,
            capital: request.capital,
            signal: rules.signal,
            long: request
                .side
                .includes_long()
                .then(|| build_long(price, request.risk_profile, &rules)),
            short: request
                .side
                .includes_short()
                .then(|| build_short(price, request.risk_profile, &rules)),
        })
    }
}
