//! Utility modules supporting corpus retrieval.
//!
//! - [`deduplicate_articles`]: Remove articles that share a DOI
//! - [`find_duplicates`]: Find DOI duplicate groups without modifying the list
//! - [`HttpClient`]: reqwest client with the crate's user agent and timeouts
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff on transient errors
//!
//! # Deduplication
//!
//! ```rust
//! use kwic_survey::models::ArticleBuilder;
//! use kwic_survey::utils::{deduplicate_articles, DuplicateStrategy};
//!
//! let articles = vec![
//!     ArticleBuilder::new("One").doi("10.1/X").build(),
//!     ArticleBuilder::new("Two").doi("10.1/x").build(),
//! ];
//! let unique = deduplicate_articles(articles, DuplicateStrategy::First);
//! assert_eq!(unique.len(), 1);
//! assert_eq!(unique[0].title, "One");
//! ```

mod dedup;
mod http;
mod retry;

pub use dedup::{deduplicate_articles, find_duplicates, DuplicateStrategy};
pub use http::HttpClient;
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
