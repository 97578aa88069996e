//! CrossRef metadata source.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::CrossRefConfig;
use crate::models::{Article, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// Fields requested from `/works`
const SELECT_FIELDS: &str = "DOI,title,abstract,issued,container-title";

/// CrossRef research source
///
/// Uses the CrossRef REST API `/works` endpoint with cursor-based deep paging.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: HttpClient,
    base_url: String,
    mailto: Option<String>,
    retry: RetryConfig,
    page_delay: Duration,
}

impl CrossRefSource {
    pub fn new(mailto: Option<String>, timeout: Duration) -> Result<Self, SourceError> {
        Self::with_base_url(CROSSREF_API_BASE, mailto, timeout)
    }

    /// Point the source at another host (a mirror or a test server)
    pub fn with_base_url(
        base_url: impl Into<String>,
        mailto: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        // Identifying ourselves puts requests in CrossRef's "polite" pool
        let client = match &mailto {
            Some(email) => HttpClient::with_user_agent(
                &format!(
                    "{}/{} (mailto:{})",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION"),
                    email
                ),
                timeout,
            )?,
            None => HttpClient::new(timeout)?,
        };

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mailto,
            retry: api_retry_config(),
            page_delay: Duration::ZERO,
        })
    }

    pub fn from_config(config: &CrossRefConfig, timeout: Duration) -> Result<Self, SourceError> {
        Ok(
            Self::with_base_url(&config.base_url, config.mailto.clone(), timeout)?
                .page_delay(Duration::from_millis(config.page_delay_ms)),
        )
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    fn works_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/works?query={}&rows={}&cursor={}&select={}",
            self.base_url,
            urlencoding::encode(&query.query),
            query.rows,
            urlencoding::encode(query.cursor.as_deref().unwrap_or("*")),
            urlencoding::encode(SELECT_FIELDS),
        );

        let mut filters = vec!["type:journal-article".to_string()];
        if let Some(year) = query.from_year {
            filters.push(format!("from-pub-date:{}", year));
        }
        if let Some(year) = query.until_year {
            filters.push(format!("until-pub-date:{}", year));
        }
        if let Some(issn) = &query.issn {
            filters.push(format!("issn:{}", issn));
        }
        if query.require_abstract {
            filters.push("has-abstract:true".to_string());
        }
        url.push_str(&format!("&filter={}", urlencoding::encode(&filters.join(","))));

        if let Some(email) = &self.mailto {
            url.push_str(&format!("&mailto={}", urlencoding::encode(email)));
        }
        url
    }
}

#[async_trait]
impl Source for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    fn page_delay(&self) -> Duration {
        self.page_delay
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let url = self.works_url(query);
        tracing::debug!("GET {}", url);

        let data: CRResponse = with_retry(self.retry, || {
            let request = self.client.get(&url);
            async move {
                let response = request.send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to search CrossRef: {}", e))
                })?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }
                if !status.is_success() {
                    return Err(SourceError::Api(format!(
                        "CrossRef API returned status: {}",
                        status
                    )));
                }

                response
                    .json::<CRResponse>()
                    .await
                    .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))
            }
        })
        .await?;

        let articles: Vec<Article> = data.message.items.into_iter().map(Article::from).collect();
        let mut response = SearchResponse::new(articles);
        response.next_cursor = data.message.next_cursor;
        response.total_results = data.message.total_results;
        Ok(response)
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: CRMessage,
}

#[derive(Debug, Deserialize)]
struct CRMessage {
    #[serde(rename = "total-results", default)]
    total_results: Option<usize>,
    #[serde(rename = "next-cursor", default)]
    next_cursor: Option<String>,
    #[serde(default)]
    items: Vec<CRItem>,
}

#[derive(Debug, Deserialize)]
struct CRItem {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(default)]
    title: Vec<String>,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
    #[serde(default)]
    issued: Option<CRDate>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl CRDate {
    /// `YYYY[-MM[-DD]]` from the first date-parts entry, if it has a year
    fn to_iso(&self) -> Option<String> {
        let parts = self.date_parts.first()?;
        let year = (*parts.first()?)?;
        let mut iso = format!("{:04}", year);
        for part in parts.iter().skip(1).take(2) {
            match part {
                Some(value) => iso.push_str(&format!("-{:02}", value)),
                None => break,
            }
        }
        Some(iso)
    }
}

impl From<CRItem> for Article {
    fn from(item: CRItem) -> Self {
        let issued = item.issued.as_ref().and_then(CRDate::to_iso);
        Article {
            doi: item.doi,
            year: issued.as_deref().and_then(Article::year_from_date),
            title: item.title.into_iter().next().unwrap_or_default(),
            r#abstract: item.abstract_text.unwrap_or_default(),
            journal: item.container_title.into_iter().next(),
            issued,
        }
    }
}
