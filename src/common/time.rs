//! Date range helpers for the range-based endpoints.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::AppError;

/// Inclusive UTC time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range from explicit bounds or from a look-back span ending at `now`.
    ///
    /// Either both bounds are given or neither is, and `start` may not
    /// come after `end`.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        span: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        match (start, end) {
            (None, None) => {
                let delta = parse_span(span)?;
                let start = now.checked_sub_signed(delta).ok_or_else(|| {
                    AppError::BadRequest(format!("Span '{}' reaches too far back", span.trim()))
                })?;
                Ok(Self { start, end: now })
            }
            (Some(start), Some(end)) if start > end => Err(AppError::BadRequest(format!(
                "start ({}) must not be after end ({})",
                start.to_rfc3339(),
                end.to_rfc3339()
            ))),
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(AppError::BadRequest(
                "Provide both start and end, or neither and use span".to_string(),
            )),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Parse a look-back span such as `48h`, `7d`, `1w` or `1m`/`1M`.
///
/// Weeks are 7 days and months are 30 days.
pub fn parse_span(span: &str) -> Result<Duration, AppError> {
    let invalid = || {
        AppError::BadRequest(format!(
            "Invalid span '{}'. Use e.g. '48h', '7d', '1w', '1M'",
            span
        ))
    };

    let trimmed = span.trim();
    let unit = trimmed.chars().last().ok_or_else(invalid)?;
    let digits = &trimmed[..trimmed.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let qty: i64 = digits.parse().map_err(|_| invalid())?;

    let delta = match unit {
        'h' | 'H' => Duration::try_hours(qty),
        'd' | 'D' => Duration::try_days(qty),
        'w' | 'W' => qty.checked_mul(7).and_then(Duration::try_days),
        'm' | 'M' => qty.checked_mul(30).and_then(Duration::try_days),
        _ => None,
    };
    delta.ok_or_else(invalid)
}

/// Parse an ISO 8601 timestamp. Timestamps without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(AppError::BadRequest(format!(
        "Invalid datetime '{}', expected ISO 8601",
        value
    )))
}

/// Parse an optional query value
pub fn parse_optional_datetime(value: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_datetime)
        .transpose()
}
