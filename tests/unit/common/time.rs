//! Unit tests for span and datetime parsing

use chrono::{Duration, TimeZone, Utc};
use cryptometrics::common::time::{parse_datetime, parse_optional_datetime, parse_span, TimeRange};
use cryptometrics::AppError;

#[test]
fn test_parse_span_units() {
    assert_eq!(parse_span("48h").unwrap(), Duration::hours(48));
    assert_eq!(parse_span("7d").unwrap(), Duration::days(7));
    assert_eq!(parse_span("2w").unwrap(), Duration::days(14));
    assert_eq!(parse_span("1m").unwrap(), Duration::days(30));
    assert_eq!(parse_span("3M").unwrap(), Duration::days(90));
    assert_eq!(parse_span(" 24h ").unwrap(), Duration::hours(24));
}

#[test]
fn test_parse_span_rejects_bad_input() {
    for span in ["", "h", "12", "1y", "-1d", "1.5h", "abc"] {
        assert!(
            matches!(parse_span(span), Err(AppError::BadRequest(_))),
            "span {:?} should be rejected",
            span
        );
    }
}

#[test]
fn test_parse_datetime_formats() {
    let expected = Utc.with_ymd_and_hms(2025, 7, 25, 12, 30, 0).unwrap();
    assert_eq!(parse_datetime("2025-07-25T12:30:00Z").unwrap(), expected);
    assert_eq!(parse_datetime("2025-07-25T14:30:00+02:00").unwrap(), expected);
    assert_eq!(parse_datetime("2025-07-25T12:30:00").unwrap(), expected);
    assert_eq!(parse_datetime("2025-07-25 12:30:00").unwrap(), expected);
    assert_eq!(
        parse_datetime("2025-07-25").unwrap(),
        Utc.with_ymd_and_hms(2025, 7, 25, 0, 0, 0).unwrap()
    );
    assert!(parse_datetime("yesterday").is_err());
}

#[test]
fn test_parse_optional_datetime_skips_blank() {
    assert_eq!(parse_optional_datetime(None).unwrap(), None);
    assert_eq!(parse_optional_datetime(Some("  ")).unwrap(), None);
    assert!(parse_optional_datetime(Some("2025-01-01")).unwrap().is_some());
}

#[test]
fn test_time_range_from_span() {
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    let range = TimeRange::resolve(None, None, "1d", now).unwrap();
    assert_eq!(range.end, now);
    assert_eq!(range.start, now - Duration::days(1));
    assert_eq!(range.duration_seconds(), 86_400.0);
    assert!(range.contains(range.start));
    assert!(range.contains(range.end));
    assert!(!range.contains(now + Duration::seconds(1)));
}

#[test]
fn test_time_range_requires_both_bounds() {
    let now = Utc::now();
    let start = Some(now - Duration::hours(1));
    assert!(matches!(
        TimeRange::resolve(start, None, "1d", now),
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        TimeRange::resolve(None, Some(now), "1d", now),
        Err(AppError::BadRequest(_))
    ));

    let range = TimeRange::resolve(start, Some(now), "not-a-span", now).unwrap();
    assert_eq!(range.start, now - Duration::hours(1));
}

#[test]
fn test_time_range_rejects_inverted_bounds() {
    let now = Utc::now();
    let earlier = now - Duration::days(3);
    assert!(matches!(
        TimeRange::resolve(Some(now), Some(earlier), "1d", now),
        Err(AppError::BadRequest(_))
    ));
    assert!(TimeRange::resolve(Some(now), Some(now), "1d", now).is_ok());
}

#[test]
fn test_time_range_rejects_span_beyond_calendar() {
    let now = Utc::now();
    for span in ["100000000d", "99999999w", "9999999999h"] {
        assert!(
            matches!(
                TimeRange::resolve(None, None, span, now),
                Err(AppError::BadRequest(_))
            ),
            "span {:?} should be rejected",
            span
        );
    }
}
