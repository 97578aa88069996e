//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::models::{SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};

/// A source that replays scripted pages per query string.
///
/// Once a query's script runs out it answers with empty pages.
#[derive(Debug, Default)]
pub struct MockSource {
    pages: Mutex<HashMap<String, VecDeque<Result<SearchResponse, SourceError>>>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next page (or error) returned for `query`
    pub fn push_page(&self, query: &str, page: Result<SearchResponse, SourceError>) {
        let mut guard = self.pages.lock().unwrap();
        guard.entry(query.to_string()).or_default().push_back(page);
    }

    /// Cursors of every request received so far, in order
    pub fn seen_cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        self.cursors.lock().unwrap().push(query.cursor.clone());
        let mut guard = self.pages.lock().unwrap();
        guard
            .get_mut(&query.query)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }
}
