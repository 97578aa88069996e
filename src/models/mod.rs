//! Core data models for articles, search operations and analysis output.

mod article;
mod records;
mod search;

pub use article::{Article, ArticleBuilder};
pub use records::{FrequencyRecord, KwicMatch, SentimentRecord, WordFrequency};
pub use search::{SearchQuery, SearchResponse};
