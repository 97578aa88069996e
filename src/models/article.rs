//! Article model representing one journal article fetched from the metadata source.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A journal article as returned by the metadata collaborator.
///
/// Articles are immutable once fetched. The `year` is derived from the issued
/// date and is absent when that date cannot be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Digital Object Identifier, used as the deduplication key
    #[serde(default)]
    pub doi: Option<String>,

    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,

    /// Article title
    #[serde(default)]
    pub title: String,

    /// Abstract text (may still carry JATS markup)
    #[serde(default)]
    pub r#abstract: String,

    /// Journal (container) title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    /// Raw issued date as reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
}

impl Article {
    /// Create an article with a title and abstract and nothing else
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            doi: None,
            year: None,
            title: title.into(),
            r#abstract: abstract_text.into(),
            journal: None,
            issued: None,
        }
    }

    /// DOI lower-cased for comparisons
    pub fn doi_key(&self) -> Option<String> {
        self.doi
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase)
    }

    /// Title and abstract joined by a single space, before normalization
    pub fn raw_text(&self) -> String {
        format!("{} {}", self.title, self.r#abstract)
    }

    /// Parse a year out of an issued-date string.
    ///
    /// Accepts `YYYY`, `YYYY-MM` and `YYYY-MM-DD`; a full date must exist on
    /// the calendar. Anything else (`"n.d."`, `"forthcoming"`, an empty
    /// string) gives `None`.
    pub fn year_from_date(date: &str) -> Option<i32> {
        let date = date.trim();
        let head = date.split('-').next()?;
        if head.len() != 4 || !head.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if date.matches('-').count() == 2 {
            return NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .map(|parsed| parsed.year());
        }
        head.parse().ok()
    }
}

/// Builder for constructing Article objects
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            article: Article::new(title, String::new()),
        }
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.article.r#abstract = abstract_text.into();
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.article.doi = Some(doi.into());
        self
    }

    /// Set year directly
    pub fn year(mut self, year: i32) -> Self {
        self.article.year = Some(year);
        self
    }

    /// Set the issued date and derive the year from it
    pub fn issued(mut self, date: impl Into<String>) -> Self {
        let date = date.into();
        self.article.year = Article::year_from_date(&date);
        self.article.issued = Some(date);
        self
    }

    /// Set journal title
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.article.journal = Some(journal.into());
        self
    }

    pub fn build(self) -> Article {
        self.article
    }
}
