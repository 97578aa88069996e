//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::Article;

/// Search query parameters for the metadata source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query string
    pub query: String,

    /// Page size
    pub rows: usize,

    /// Deep-paging cursor; `None` asks for the first page
    pub cursor: Option<String>,

    /// Earliest publication year (inclusive)
    pub from_year: Option<i32>,

    /// Latest publication year (inclusive)
    pub until_year: Option<i32>,

    /// Restrict to one journal by ISSN
    pub issn: Option<String>,

    /// Only return works that carry an abstract
    pub require_abstract: bool,

    /// Stop paging once this many articles were collected
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            rows: 100,
            cursor: None,
            from_year: None,
            until_year: None,
            issn: None,
            require_abstract: true,
            max_results: 1000,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set page size
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set year range
    pub fn years(mut self, from: Option<i32>, until: Option<i32>) -> Self {
        self.from_year = from;
        self.until_year = until;
        self
    }

    /// Set ISSN filter
    pub fn issn(mut self, issn: impl Into<String>) -> Self {
        self.issn = Some(issn.into());
        self
    }

    pub fn require_abstract(mut self, require: bool) -> Self {
        self.require_abstract = require;
        self
    }

    /// Copy of this query positioned at `cursor`
    pub fn at_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,

    /// Cursor for the following page, if the source has one
    pub next_cursor: Option<String>,

    /// Total number of matching works reported by the source
    pub total_results: Option<usize>,
}

impl SearchResponse {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            next_cursor: None,
            total_results: None,
        }
    }

    /// Set the next-page cursor
    pub fn next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }
}
