//! # kwic-survey
//!
//! Keyword-in-context concordances, term frequencies and sentiment over
//! journal article metadata fetched from CrossRef.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Article, KwicMatch, SearchQuery, etc.)
//! - [`sources`]: Metadata sources behind the [`Source`] trait, with cursor paging
//! - [`analysis`]: Normalization, sentence segmentation, lexicon matching and aggregation
//! - [`utils`]: HTTP client, retry, and DOI deduplication
//! - [`config`]: Configuration management
//! - [`ui`]: Table, JSON and tab-separated output

pub mod analysis;
pub mod config;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analysis::{KwicExtractor, Lexicon, MatchPolicy, Survey, SurveyReport};
pub use models::{Article, KwicMatch};
pub use sources::{CrossRefSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
