//! Configuration management.
//!
//! Lexicons, search terms and analysis settings are loaded once at startup
//! into an immutable [`Config`] that is passed explicitly to the components
//! that need it.

mod file_config;

pub use file_config::{find_config_file, load_config, save_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analysis::TimeBucket;
use crate::models::SearchQuery;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CrossRef API settings
    #[serde(default)]
    pub crossref: CrossRefConfig,

    /// What to fetch and which topics to keep
    #[serde(default)]
    pub search: SearchConfig,

    /// Pejorative-term lexicon
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Word-frequency and sentiment settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CrossRef API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRefConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact address for CrossRef's polite pool
    #[serde(default)]
    pub mailto: Option<String>,

    /// Page size
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Cap on articles collected per query
    #[serde(default = "default_max_results")]
    pub max_results_per_query: usize,

    /// Pause between page requests
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,
}

impl Default for CrossRefConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mailto: std::env::var("CROSSREF_MAILTO").ok(),
            rows: default_rows(),
            max_results_per_query: default_max_results(),
            page_delay_ms: default_page_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.crossref.org".to_string()
}

fn default_rows() -> usize {
    100
}

fn default_max_results() -> usize {
    1000
}

fn default_page_delay() -> u64 {
    250
}

/// Search terms and filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// One API query per entry
    #[serde(default)]
    pub queries: Vec<String>,

    /// Topical terms an article must mention to be analyzed; falls back to
    /// `queries` when empty
    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub from_year: Option<i32>,

    #[serde(default)]
    pub until_year: Option<i32>,

    /// Restrict to one journal
    #[serde(default)]
    pub issn: Option<String>,

    #[serde(default = "default_true")]
    pub require_abstract: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            topics: Vec::new(),
            from_year: None,
            until_year: None,
            issn: None,
            require_abstract: true,
        }
    }
}

impl SearchConfig {
    /// Terms used by the topical filter
    pub fn topic_terms(&self) -> &[String] {
        if self.topics.is_empty() {
            &self.queries
        } else {
            &self.topics
        }
    }

    /// One [`SearchQuery`] per configured query
    pub fn to_queries(&self, crossref: &CrossRefConfig) -> Vec<SearchQuery> {
        self.queries
            .iter()
            .map(|q| {
                let mut query = SearchQuery::new(q.as_str())
                    .rows(crossref.rows)
                    .max_results(crossref.max_results_per_query)
                    .years(self.from_year, self.until_year)
                    .require_abstract(self.require_abstract);
                query.issn = self.issn.clone();
                query
            })
            .collect()
    }
}

/// Pejorative-term lexicon settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Inline terms
    #[serde(default = "default_lexicon_terms")]
    pub terms: Vec<String>,

    /// Extra terms, one per line
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Emit only the leftmost match of each sentence
    #[serde(default = "default_true")]
    pub first_match_only: bool,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            terms: default_lexicon_terms(),
            file: None,
            first_match_only: true,
        }
    }
}

fn default_lexicon_terms() -> Vec<String> {
    [
        "abnormal",
        "abnormality",
        "anomaly",
        "biological anomaly",
        "defect",
        "defective",
        "deficiency",
        "deficient",
        "deviance",
        "deviant",
        "disorder",
        "dysfunction",
        "inferior",
        "maladaptive",
        "pathological",
        "perversion",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Word-frequency and sentiment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Group by `year` or `decade`
    #[serde(default)]
    pub bucket: TimeBucket,

    /// Words kept per period
    #[serde(default = "default_top_words")]
    pub top_words: usize,

    /// Replace the built-in English stop words
    #[serde(default)]
    pub stop_words_file: Option<PathBuf>,

    /// Added to whichever stop-word list is in use
    #[serde(default)]
    pub extra_stop_words: Vec<String>,

    /// Sentiment lexicon; sentiment is skipped when unset
    #[serde(default)]
    pub sentiment_file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bucket: TimeBucket::Year,
            top_words: default_top_words(),
            stop_words_file: None,
            extra_stop_words: Vec::new(),
            sentiment_file: None,
        }
    }
}

fn default_top_words() -> usize {
    20
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
