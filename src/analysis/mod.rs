//! Text analysis over fetched articles.
//!
//! The pipeline is strictly sequential over in-memory data:
//!
//! - [`normalize_text`]: lower-case, strip `<...>` markup, collapse whitespace
//! - [`sentences`]: lazy, abbreviation-aware sentence segmentation
//! - [`TermMatcher`]: case-insensitive whole-word matching of a [`Lexicon`]
//! - [`KwicExtractor`]: keyword-in-context records per sentence
//! - [`frequency_by_year`] / [`frequency_by_bucket`]: hits per document over time
//! - [`word_frequencies`]: most frequent non-stop words per period
//! - [`sentiment_by_bucket`]: lexicon-based sentiment per period
//! - [`Survey`]: all of the above, configured from [`crate::config::Config`]
//!
//! ```rust
//! use kwic_survey::analysis::{KwicExtractor, Lexicon, MatchPolicy};
//! use kwic_survey::models::ArticleBuilder;
//!
//! let lexicon = Lexicon::new(["abnormal", "biological anomaly"]);
//! let kwic = KwicExtractor::new(&lexicon, MatchPolicy::default()).unwrap();
//! let article = ArticleBuilder::new("Trait study")
//!     .abstract_text("This trait is considered abnormal.")
//!     .year(1984)
//!     .build();
//!
//! let matches = kwic.extract_article(&article);
//! assert_eq!(matches[0].keyword, "abnormal");
//! assert_eq!(matches[0].left_context, "trait study this trait is considered");
//! ```

mod aggregate;
mod kwic;
mod lexicon;
mod normalize;
mod sentences;
mod sentiment;
mod survey;
mod words;

pub use aggregate::{frequency_by_bucket, frequency_by_year, TimeBucket};
pub use kwic::{KwicExtractor, MatchPolicy};
pub use lexicon::{Lexicon, TermMatcher};
pub use normalize::{article_text, normalize_text};
pub use sentences::{sentences, Sentences};
pub use sentiment::{sentiment_by_bucket, SentimentLexicon, TextSentiment};
pub use survey::{Survey, SurveyReport};
pub use words::{tokenize, word_frequencies, StopWords};

/// Errors raised by the analysis layer
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A lexicon term could not be compiled into a pattern
    #[error("Invalid pattern for term '{term}': {source}")]
    InvalidPattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    /// A period has hits but no documents to divide by
    #[error("Period {year} has {hits} pejorative hits but no documents")]
    NoDocuments { year: i32, hits: usize },

    /// A lexicon file line could not be parsed
    #[error("Malformed lexicon line {line}: {message}")]
    LexiconFormat { line: usize, message: String },

    /// A lexicon or stop-word file could not be read
    #[error("IO error: {0}")]
    Io(String),
}
