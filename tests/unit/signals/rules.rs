//! Unit tests for the rule vote

use cryptometrics::models::indicators::IndicatorSnapshot;
use cryptometrics::models::signal::{Signal, VoteLabel};
use cryptometrics::signals::{Aggregator, RulesService, Thresholds, MIN_VOTES};

fn rules() -> RulesService {
    RulesService::with_thresholds("BTC/USDT", Thresholds::default())
}

fn bullish_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi14: Some(25.0),
        bbwp: Some(1.0),
        adx14: Some(30.0),
        konkorde_value: Some(12.0),
        ao: Some(3.0),
        ema50: Some(101.0),
        sma50: Some(100.0),
        ..IndicatorSnapshot::default()
    }
}

#[test]
fn test_all_entry_votes() {
    let result = rules().evaluate(&bullish_snapshot());

    assert_eq!(result.signal, Signal::Entry);
    assert_eq!(result.entry_votes, 6);
    assert_eq!(result.exit_votes, 0);
    assert_eq!(
        result.support_entry,
        vec![
            VoteLabel::RsiOversold,
            VoteLabel::VolLow,
            VoteLabel::AdxTrend,
            VoteLabel::KonkordeBuy,
            VoteLabel::AoPositive,
            VoteLabel::Ema50GtSma50,
        ]
    );
    assert_eq!(result.explain_entry.len(), 6);
    assert!(result.explain_exit.is_empty());
}

#[test]
fn test_exit_signal() {
    let snapshot = IndicatorSnapshot {
        rsi14: Some(75.0),
        bbwp: Some(5.0),
        adx14: Some(10.0),
        konkorde_value: Some(-1.0),
        ao: Some(-2.0),
        ema50: Some(99.0),
        sma50: Some(100.0),
        ..IndicatorSnapshot::default()
    };
    let result = rules().evaluate(&snapshot);

    assert_eq!(result.signal, Signal::Exit);
    assert_eq!(result.exit_votes, 5);
    assert_eq!(result.entry_votes, 0);
    assert_eq!(result.support_exit[0], VoteLabel::RsiOverbought);
    assert_eq!(result.support_exit[1], VoteLabel::VolHigh);
}

#[test]
fn test_three_votes_stay_neutral() {
    let snapshot = IndicatorSnapshot {
        rsi14: Some(25.0),
        konkorde_value: Some(1.0),
        ao: Some(1.0),
        ..IndicatorSnapshot::default()
    };
    let result = rules().evaluate(&snapshot);
    assert_eq!(result.entry_votes, 3);
    assert_eq!(result.signal, Signal::Neutral);
}

#[test]
fn test_missing_inputs_and_boundaries_abstain() {
    assert_eq!(rules().evaluate(&IndicatorSnapshot::default()).entry_votes, 0);

    // values exactly on a threshold do not vote
    let snapshot = IndicatorSnapshot {
        rsi14: Some(30.0),
        bbwp: Some(4.0),
        adx14: Some(25.0),
        konkorde_value: Some(0.0),
        ao: Some(0.0),
        ema50: Some(100.0),
        sma50: Some(100.0),
        ..IndicatorSnapshot::default()
    };
    let result = rules().evaluate(&snapshot);
    assert_eq!(result.entry_votes + result.exit_votes, 0);
    assert_eq!(result.signal, Signal::Neutral);
}

#[test]
fn test_custom_thresholds_change_votes() {
    let thresholds = Thresholds {
        rsi_oversold: 20.0,
        ..Thresholds::default()
    };
    let result = RulesService::with_thresholds("BTC/USDT", thresholds).evaluate(&bullish_snapshot());
    assert!(!result.support_entry.contains(&VoteLabel::RsiOversold));
    assert_eq!(result.entry_votes, 5);
}

#[test]
fn test_aggregator_majority() {
    assert_eq!(MIN_VOTES, 4);
    assert_eq!(Aggregator::decide(4, 0), Signal::Entry);
    assert_eq!(Aggregator::decide(4, 2), Signal::Entry);
    assert_eq!(Aggregator::decide(3, 0), Signal::Neutral);
    assert_eq!(Aggregator::decide(0, 4), Signal::Exit);
    assert_eq!(Aggregator::decide(2, 2), Signal::Neutral);
}

#[test]
fn test_labels_serialize_snake_case() {
    let json = serde_json::to_value(rules().evaluate(&bullish_snapshot())).unwrap();
    assert_eq!(json["signal"], "entry");
    assert_eq!(json["support_entry"][0], "rsi_oversold");
    assert_eq!(json["support_entry"][5], "ema50_gt_sma50");
}
