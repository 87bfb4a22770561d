use serde::{Deserialize, Serialize};

/// Outcome of the threshold vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Entry,
    Exit,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Entry => "entry",
            Signal::Exit => "exit",
            Signal::Neutral => "neutral",
        }
    }
}

/// A single rule outcome that supports entering or exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteLabel {
    RsiOversold,
    RsiOverbought,
    VolLow,
    VolHigh,
    AdxTrend,
    KonkordeBuy,
    KonkordeSell,
    AoPositive,
    AoNegative,
    #[serde(rename = "ema50_gt_sma50")]
    Ema50GtSma50,
    #[serde(rename = "ema50_lt_sma50")]
    Ema50LtSma50,
}

impl VoteLabel {
    /// Human-readable reading of the vote
    pub fn explanation(&self) -> &'static str {
        match self {
            VoteLabel::RsiOversold => "RSI below the oversold threshold, possible bullish rebound",
            VoteLabel::RsiOverbought => "RSI above the overbought threshold, possible correction",
            VoteLabel::VolLow => "Low volatility (BBWP), a move may be starting",
            VoteLabel::VolHigh => "High volatility (BBWP), risk of exhaustion or profit taking",
            VoteLabel::AdxTrend => "ADX above the trend level, market has a defined direction",
            VoteLabel::KonkordeBuy => "Konkorde shows buying pressure (OBV above its EMA)",
            VoteLabel::KonkordeSell => "Konkorde shows selling pressure (OBV below its EMA)",
            VoteLabel::AoPositive => "Awesome Oscillator positive, bullish momentum",
            VoteLabel::AoNegative => "Awesome Oscillator negative, bearish momentum",
            VoteLabel::Ema50GtSma50 => "EMA50 above SMA50, short-term bullish bias",
            VoteLabel::Ema50LtSma50 => "EMA50 below SMA50, short-term bearish bias",
        }
    }
}

/// Result of evaluating the rule set against one indicator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub signal: Signal,
    pub entry_votes: usize,
    pub exit_votes: usize,
    pub support_entry: Vec<VoteLabel>,
    pub support_exit: Vec<VoteLabel>,
    pub explain_entry: Vec<String>,
    pub explain_exit: Vec<String>,
}
