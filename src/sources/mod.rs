//! Bibliographic metadata sources.
//!
//! This module defines the [`Source`] trait that the metadata collaborator
//! implements, plus two helpers that sit on top of it:
//!
//! - [`collect_articles`] follows deep-paging cursors for one query
//! - [`fetch_corpus`] runs several queries, logging and skipping the ones
//!   that fail, and deduplicates the union by DOI
//!
//! [`CrossRefSource`] talks to the CrossRef REST API; [`MockSource`] returns
//! scripted pages for tests.

mod crossref;
pub mod mock;

pub use crossref::CrossRefSource;
pub use mock::MockSource;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::{Article, SearchQuery, SearchResponse};
use crate::utils::{deduplicate_articles, DuplicateStrategy};

/// Interface for a paginated article search API.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "crossref")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one page of results for `query`
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;

    /// Pause between consecutive page requests
    fn page_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Collect every article for one query, following cursors.
///
/// Stops at `query.max_results`, at an empty page, or when the source stops
/// handing out cursors.
pub async fn collect_articles(
    source: &dyn Source,
    query: &SearchQuery,
) -> Result<Vec<Article>, SourceError> {
    if query.rows == 0 {
        return Err(SourceError::InvalidRequest("rows must be positive".to_string()));
    }

    let mut articles = Vec::new();
    let mut page = query.clone();

    loop {
        let response = source.search(&page).await?;
        let received = response.articles.len();
        articles.extend(response.articles);
        tracing::debug!(
            "{}: page of {} for '{}' ({} so far, {:?} total)",
            source.id(),
            received,
            query.query,
            articles.len(),
            response.total_results
        );

        if received == 0 || articles.len() >= query.max_results {
            break;
        }
        match response.next_cursor {
            Some(cursor) if Some(&cursor) != page.cursor.as_ref() => page = page.at_cursor(cursor),
            _ => break,
        }

        let delay = source.page_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    articles.truncate(query.max_results);
    Ok(articles)
}

/// Articles fetched by [`fetch_corpus`] plus the queries that failed
#[derive(Debug, Default)]
pub struct FetchReport {
    pub articles: Vec<Article>,
    pub failed_queries: Vec<(String, SourceError)>,
}

/// Run every query in turn. A failing query is logged and skipped rather
/// than aborting the whole fetch. The union is deduplicated by DOI.
pub async fn fetch_corpus(source: &dyn Source, queries: &[SearchQuery]) -> FetchReport {
    let mut report = FetchReport::default();

    for query in queries {
        match collect_articles(source, query).await {
            Ok(articles) => {
                info!(
                    "{}: {} articles for '{}'",
                    source.name(),
                    articles.len(),
                    query.query
                );
                report.articles.extend(articles);
            }
            Err(e) => {
                warn!("{}: query '{}' failed: {}", source.name(), query.query, e);
                report.failed_queries.push((query.query.clone(), e));
            }
        }
    }

    report.articles = deduplicate_articles(report.articles, DuplicateStrategy::First);
    report
}
