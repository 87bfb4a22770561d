//! Candle timeframes known to the service.

/// A supported candle timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeframeSpec {
    pub code: &'static str,
    pub seconds: u64,
    /// Lower is preferred (more granular)
    pub priority: u32,
    pub max_candles: usize,
}

const fn tf(code: &'static str, seconds: u64, priority: u32) -> TimeframeSpec {
    TimeframeSpec {
        code,
        seconds,
        priority,
        max_candles: 1000,
    }
}

pub const TIMEFRAMES: [TimeframeSpec; 15] = [
    tf("1m", 60, 1),
    tf("3m", 180, 2),
    tf("5m", 300, 3),
    tf("15m", 900, 4),
    tf("30m", 1_800, 5),
    tf("1h", 3_600, 6),
    tf("2h", 7_200, 7),
    tf("4h", 14_400, 8),
    tf("6h", 21_600, 9),
    tf("8h", 28_800, 10),
    tf("12h", 43_200, 11),
    tf("1d", 86_400, 12),
    tf("3d", 259_200, 13),
    tf("1w", 604_800, 14),
    tf("1M", 2_592_000, 15),
];

/// Look up a timeframe by its exact code (`1m` is minutes, `1M` is months)
pub fn lookup(code: &str) -> Option<&'static TimeframeSpec> {
    TIMEFRAMES.iter().find(|spec| spec.code == code)
}

/// Map readable aliases (`daily`, `weekly`, `monthly` and their Spanish
/// forms) to exchange timeframe codes. Other values pass through.
pub fn resolve_alias(timeframe: &str) -> String {
    match timeframe.to_lowercase().as_str() {
        "daily" | "diario" => "1d".to_string(),
        "weekly" | "semanal" => "1w".to_string(),
        "monthly" | "mensual" => "1M".to_string(),
        _ => timeframe.to_string(),
    }
}
