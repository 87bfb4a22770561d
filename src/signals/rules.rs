//! Threshold rules mapping indicator values to entry/exit votes

use crate::models::indicators::IndicatorSnapshot;
use crate::models::signal::{RuleEvaluation, VoteLabel};
use crate::signals::aggregation::Aggregator;
use crate::signals::thresholds::{ThresholdError, Thresholds};

/// Evaluates the six fixed rules against an indicator snapshot.
#[derive(Debug, Clone)]
pub struct RulesService {
    symbol: String,
    thresholds: Thresholds,
}

impl RulesService {
    /// Rules for `symbol` with thresholds resolved from the environment
    pub fn new(symbol: &str) -> Result<Self, ThresholdError> {
        Ok(Self::with_thresholds(symbol, Thresholds::from_env(symbol)?))
    }

    pub fn with_thresholds(symbol: &str, thresholds: Thresholds) -> Self {
        Self {
            symbol: symbol.to_string(),
            thresholds,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Tally the votes and decide the signal.
    ///
    /// Rules whose inputs are missing do not vote.
    pub fn evaluate(&self, indicators: &IndicatorSnapshot) -> RuleEvaluation {
        let votes = [
            self.analyze_rsi(indicators.rsi14),
            self.analyze_bbwp(indicators.bbwp),
            self.analyze_adx(indicators.adx14),
            analyze_sign(indicators.konkorde_value, VoteLabel::KonkordeBuy, VoteLabel::KonkordeSell),
            analyze_sign(indicators.ao, VoteLabel::AoPositive, VoteLabel::AoNegative),
            analyze_ma_bias(indicators.ema50, indicators.sma50),
        ];

        let mut support_entry = Vec::new();
        let mut support_exit = Vec::new();
        for vote in votes {
            match vote {
                Vote::Entry(label) => support_entry.push(label),
                Vote::Exit(label) => support_exit.push(label),
                Vote::Abstain => {}
            }
        }

        let entry_votes = support_entry.len();
        let exit_votes = support_exit.len();

        RuleEvaluation {
            signal: Aggregator::decide(entry_votes, exit_votes),
            entry_votes,
            exit_votes,
            explain_entry: explain(&support_entry),
            explain_exit: explain(&support_exit),
            support_entry,
            support_exit,
        }
    }

    fn analyze_rsi(&self, rsi: Option<f64>) -> Vote {
        match rsi {
            Some(rsi) if rsi < self.thresholds.rsi_oversold => Vote::Entry(VoteLabel::RsiOversold),
            Some(rsi) if rsi > self.thresholds.rsi_overbought => Vote::Exit(VoteLabel::RsiOverbought),
            _ => Vote::Abstain,
        }
    }

    fn analyze_bbwp(&self, bbwp: Option<f64>) -> Vote {
        match bbwp {
            Some(bbwp) if bbwp < self.thresholds.bbwp_low => Vote::Entry(VoteLabel::VolLow),
            Some(bbwp) if bbwp > self.thresholds.bbwp_high => Vote::Exit(VoteLabel::VolHigh),
            _ => Vote::Abstain,
        }
    }

    /// ADX only ever supports entries
    fn analyze_adx(&self, adx: Option<f64>) -> Vote {
        match adx {
            Some(adx) if adx > self.thresholds.adx_trend => Vote::Entry(VoteLabel::AdxTrend),
            _ => Vote::Abstain,
        }
    }
}

enum Vote {
    Entry(VoteLabel),
    Exit(VoteLabel),
    Abstain,
}

fn analyze_sign(value: Option<f64>, positive: VoteLabel, negative: VoteLabel) -> Vote {
    match value {
        Some(v) if v > 0.0 => Vote::Entry(positive),
        Some(v) if v < 0.0 => Vote::Exit(negative),
        _ => Vote::Abstain,
    }
}

/// Simple short-term trend: EMA50 against SMA50
fn analyze_ma_bias(ema50: Option<f64>, sma50: Option<f64>) -> Vote {
    match (ema50, sma50) {
        (Some(ema), Some(sma)) if ema > sma => Vote::Entry(VoteLabel::Ema50GtSma50),
        (Some(ema), Some(sma)) if ema < sma => Vote::Exit(VoteLabel::Ema50LtSma50),
        _ => Vote::Abstain,
    }
}

fn explain(labels: &[VoteLabel]) -> Vec<String> {
    labels.iter().map(|label| label.explanation().to_string()).collect()
}
