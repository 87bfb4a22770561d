//! Candle fixtures shared by the unit tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use cryptometrics::models::candle::{Candle, CandleSeries};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Hourly candles with the given closes; each bar spans close +/- 0.5
pub fn candles_from_closes(closes: &[f64]) -> CandleSeries {
    let start = base_time();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                1000.0 + i as f64,
                start + Duration::hours(i as i64),
            )
        })
        .collect();
    CandleSeries::new(candles)
}

pub fn uptrend(count: usize) -> CandleSeries {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 + i as f64).collect();
    candles_from_closes(&closes)
}

pub fn downtrend(count: usize) -> CandleSeries {
    let closes: Vec<f64> = (0..count).map(|i| 400.0 - i as f64).collect();
    candles_from_closes(&closes)
}

/// Oscillating closes around 100
pub fn choppy(count: usize) -> CandleSeries {
    let closes: Vec<f64> = (0..count)
        .map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    candles_from_closes(&closes)
}

/// In-memory provider serving canned series per timeframe
pub struct StubProvider {
    pub name: &'static str,
    pub series: std::collections::HashMap<String, CandleSeries>,
}

impl StubProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            series: std::collections::HashMap::new(),
        }
    }

    pub fn with_series(mut self, timeframe: &str, candles: CandleSeries) -> Self {
        self.series.insert(timeframe.to_string(), candles);
        self
    }
}

#[async_trait::async_trait]
impl cryptometrics::services::MarketDataProvider for StubProvider {
    fn exchange(&self) -> &str {
        self.name
    }

    async fn fetch_ohlcv(
        &self,
        _symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<CandleSeries, cryptometrics::services::MarketDataError> {
        let series = self.series.get(timeframe).ok_or_else(|| {
            cryptometrics::services::MarketDataError::Api {
                exchange: self.name.to_string(),
                status: 503,
                body: format!("no data for {}", timeframe),
            }
        })?;
        let skip = series.len().saturating_sub(limit);
        Ok(CandleSeries::new(series.candles()[skip..].to_vec()))
    }
}

/// Candles every `step` starting at `start`, closes rising by one
pub fn spaced(start: DateTime<Utc>, step: Duration, count: usize) -> CandleSeries {
    let candles = (0..count)
        .map(|i| {
            let close = 100.0 + i as f64;
            Candle::new(close - 1.0, close + 0.5, close - 1.5, close, 10.0, start + step * i as i32)
        })
        .collect();
    CandleSeries::new(candles)
}
