//! Row-oriented output records produced by the analysis.

use serde::{Deserialize, Serialize};

/// One keyword-in-context hit: a lexicon term found as a whole word in a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KwicMatch {
    /// Publication year of the source article, if known
    pub year: Option<i32>,

    /// DOI of the source article
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// The matched lexicon term
    pub keyword: String,

    /// The full normalized sentence
    pub sentence: String,

    /// Text before the first occurrence of the keyword, trimmed
    pub left_context: String,

    /// Text after the first occurrence of the keyword, trimmed
    pub right_context: String,
}

/// Pejorative-term hits against document counts for one year (or decade).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub year: i32,
    pub pejorative_hits: usize,
    pub total_docs: usize,
    pub freq_per_doc: f64,
}

/// Count of one non-stop word within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub period: i32,
    pub word: String,
    pub count: usize,
    /// `count` over all counted tokens of the period
    pub share: f64,
}

/// Sentiment totals for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub period: i32,
    pub docs: usize,
    pub scored_tokens: usize,
    pub positive: usize,
    pub negative: usize,
    pub net_score: i64,
    pub score_per_doc: f64,
}
