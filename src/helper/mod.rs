use std::fmt;

pub const COMMENT_TAGGER_RUBRIC: &str = "Classify crypto sentiment: POS for positive/bullish, NEG for negative/bearish, NEU for neutral. Output only: POS, NEG, or NEU";

pub const MARKET_EXPERT_RUBRIC: &str = "You are a crypto market sentiment analysis expert. Your task is to classify the sentiment of a given crypto-related statement into one of three categories: POS (Positive): The statement clearly expresses bullish or optimistic sentiment, especially in the context of current or target price. NEG (Negative): The statement clearly expresses bearish or pessimistic sentiment, especially if it expects a drop or criticizes a coin. NEU (Neutral or Mixed): The statement contains mixed, unclear, or ambiguous opinions, or lacks strong sentiment. Always consider current or referenced market price if applicable. For example, saying 'BTC will reach $30,000' can be pessimistic if BTC is already at $60,000. Output strictly one of: POS / NEG / NEU";

/// Safe neutral default used by the comment tagger.
pub const NEUTRAL_SENTINEL: &str = "NEU";

/// Explicit "no answer" marker used by the market expert.
pub const EMPTY_SENTINEL: &str = "EMPTY";

/// Typed view over the three labels the rubrics ask for.
///
/// The classifier never rejects other strings, this is only a convenience
/// for callers that want to branch on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Pos,
    Neg,
    Neu,
}

impl Label {
    pub fn parse(raw: &str) -> Option<Label> {
        match raw.trim() {
            "POS" => Some(Label::Pos),
            "NEG" => Some(Label::Neg),
            "NEU" => Some(Label::Neu),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Pos => "POS",
            Label::Neg => "NEG",
            Label::Neu => "NEU",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
