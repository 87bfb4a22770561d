//! Range statistics over a window of candles and the largest single-candle move.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::common::math;
use crate::common::time::TimeRange;
use crate::common::OrderedMap;
use crate::error::AppError;
use crate::indicators::{momentum, trend};
use crate::models::candle::CandleSeries;
use crate::services::market_data::MarketDataService;

pub const DEFAULT_CANDLES_LIMIT: usize = 1500;
pub const DEFAULT_TOP_N: usize = 10;
pub const MAX_TOP_N: usize = 100;

/// Statistic that can be requested from the averages endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageIndicator {
    Close,
    Volume,
    Rsi,
    Adx,
    HighestPrice,
    LowestPrice,
    HighestPrices,
    LowestPrices,
    AvgPrice,
    AvgHigh,
    AvgLow,
}

impl AverageIndicator {
    pub const ALL: [AverageIndicator; 11] = [
        AverageIndicator::Close,
        AverageIndicator::Volume,
        AverageIndicator::Rsi,
        AverageIndicator::Adx,
        AverageIndicator::HighestPrice,
        AverageIndicator::LowestPrice,
        AverageIndicator::HighestPrices,
        AverageIndicator::LowestPrices,
        AverageIndicator::AvgPrice,
        AverageIndicator::AvgHigh,
        AverageIndicator::AvgLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AverageIndicator::Close => "close",
            AverageIndicator::Volume => "volume",
            AverageIndicator::Rsi => "rsi",
            AverageIndicator::Adx => "adx",
            AverageIndicator::HighestPrice => "highest_price",
            AverageIndicator::LowestPrice => "lowest_price",
            AverageIndicator::HighestPrices => "highest_prices",
            AverageIndicator::LowestPrices => "lowest_prices",
            AverageIndicator::AvgPrice => "avg_price",
            AverageIndicator::AvgHigh => "avg_high",
            AverageIndicator::AvgLow => "avg_low",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == name)
    }

    /// Parse a comma separated list. An empty list selects every indicator.
    pub fn parse_list(raw: Option<&str>) -> Result<Vec<Self>, AppError> {
        let names: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            return Ok(Self::ALL.to_vec());
        }

        let unknown: Vec<&str> = names
            .iter()
            .filter(|n| Self::from_name(n).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Unsupported indicators requested: {}",
                unknown.join(", ")
            )));
        }

        let mut selected = Vec::with_capacity(names.len());
        for indicator in names.iter().filter_map(|n| Self::from_name(n)) {
            if !selected.contains(&indicator) {
                selected.push(indicator);
            }
        }
        Ok(selected)
    }
}

/// Either a single statistic or a ranked list of prices
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AverageValue {
    Scalar(Option<f64>),
    List(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReboundType {
    Bullish,
    Bearish,
}

/// Largest absolute close-to-close move inside the range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorRebound {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ReboundType,
    pub move_pct: f64,
}

#[derive(Debug, Clone)]
pub struct AveragesRequest {
    pub symbol: String,
    pub timeframe: String,
    pub exchange: String,
    pub range: TimeRange,
    pub indicators: Vec<AverageIndicator>,
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AveragesResponse {
    pub symbol: String,
    pub timeframe: String,
    pub averages: OrderedMap<AverageIndicator, AverageValue>,
    pub major_rebound: MajorRebound,
}

/// `top_n` must lie in `1..=100`
pub fn validate_top_n(top_n: usize) -> Result<usize, AppError> {
    if (1..=MAX_TOP_N).contains(&top_n) {
        Ok(top_n)
    } else {
        Err(AppError::BadRequest(format!(
            "top_n must be between 1 and {}, got {}",
            MAX_TOP_N, top_n
        )))
    }
}

#[derive(Clone)]
pub struct AveragesService {
    market: MarketDataService,
}

impl AveragesService {
    pub fn new(market: MarketDataService) -> Self {
        Self { market }
    }

    pub async fn execute(&self, request: &AveragesRequest) -> Result<AveragesResponse, AppError> {
        let candles = self
            .market
            .get_ohlcv(
                &request.exchange,
                &request.symbol,
                &request.timeframe,
                DEFAULT_CANDLES_LIMIT,
            )
            .await?;

        let in_range = candles.between(&request.range);
        debug!(
            symbol = %request.symbol,
            fetched = candles.len(),
            in_range = in_range.len(),
            "Computing range averages"
        );

        let (averages, major_rebound) = compute(&in_range, &request.indicators, request.top_n)?;

        Ok(AveragesResponse {
            symbol: request.symbol.clone(),
            timeframe: request.timeframe.clone(),
            averages,
            major_rebound,
        })
    }
}

/// Compute the requested statistics over candles already restricted to the range
pub fn compute(
    candles: &CandleSeries,
    indicators: &[AverageIndicator],
    top_n: usize,
) -> Result<(OrderedMap<AverageIndicator, AverageValue>, MajorRebound), AppError> {
    if candles.len() < 2 {
        return Err(AppError::InsufficientData(
            "Not enough candles in range to compute averages and rebounds".to_string(),
        ));
    }

    let averages = indicators
        .iter()
        .map(|&indicator| (indicator, value_for(indicator, candles, top_n)))
        .collect();

    Ok((averages, major_rebound(candles)?))
}

fn value_for(indicator: AverageIndicator, candles: &CandleSeries, top_n: usize) -> AverageValue {
    let scalar = |v: Option<f64>| AverageValue::Scalar(v.and_then(math::finite));
    let highs = candles.highs();
    let lows = candles.lows();

    match indicator {
        AverageIndicator::Close => scalar(math::mean(&candles.closes())),
        AverageIndicator::Volume => scalar(math::mean(&candles.volumes())),
        AverageIndicator::Rsi => {
            let rsi = momentum::rsi_series(&candles.closes(), momentum::RSI_PERIOD);
            scalar(mean_defined(&rsi))
        }
        AverageIndicator::Adx => {
            let adx = trend::adx_series(&highs, &lows, &candles.closes(), trend::ADX_PERIOD);
            scalar(mean_defined(&adx))
        }
        AverageIndicator::HighestPrice => scalar(highs.iter().copied().reduce(f64::max)),
        AverageIndicator::LowestPrice => scalar(lows.iter().copied().reduce(f64::min)),
        AverageIndicator::HighestPrices => AverageValue::List(top_highs(&highs, top_n)),
        AverageIndicator::LowestPrices => AverageValue::List(bottom_lows(&lows, top_n)),
        AverageIndicator::AvgPrice => {
            let mids: Vec<f64> = candles.iter().map(|c| c.hl2()).collect();
            scalar(math::mean(&mids))
        }
        AverageIndicator::AvgHigh => scalar(math::mean(&top_highs(&highs, top_n))),
        AverageIndicator::AvgLow => scalar(math::mean(&bottom_lows(&lows, top_n))),
    }
}

fn mean_defined(series: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = series.iter().filter_map(|v| *v).collect();
    math::mean(&defined)
}

/// The `n` largest highs, descending
fn top_highs(highs: &[f64], n: usize) -> Vec<f64> {
    let mut sorted: Vec<f64> = highs.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.truncate(n);
    sorted
}

/// The `n` smallest lows, ascending
fn bottom_lows(lows: &[f64], n: usize) -> Vec<f64> {
    let mut sorted: Vec<f64> = lows.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.truncate(n);
    sorted
}

/// Largest absolute percentage change between consecutive closes.
/// The first occurrence wins on ties.
pub fn major_rebound(candles: &CandleSeries) -> Result<MajorRebound, AppError> {
    let changes = math::pct_changes(&candles.closes());
    let timestamps: Vec<DateTime<Utc>> = candles.timestamps();

    let mut best: Option<(usize, f64)> = None;
    for (i, change) in changes.iter().copied().enumerate() {
        if !change.is_finite() {
            continue;
        }
        match best {
            Some((_, current)) if change.abs() <= current.abs() => {}
            _ => best = Some((i, change)),
        }
    }

    let (idx, change) = best.ok_or_else(|| {
        AppError::InsufficientData("Not enough data to compute rebounds".to_string())
    })?;

    Ok(MajorRebound {
        date: timestamps[idx + 1].to_rfc3339(),
        kind: if change > 0.0 {
            ReboundType::Bullish
        } else {
            ReboundType::Bearish
        },
        move_pct: math::round_to(change.abs(), 2),
    })
}
