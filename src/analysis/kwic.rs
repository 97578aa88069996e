//! Keyword-in-context extraction.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::lexicon::{Lexicon, TermMatcher};
use super::normalize::article_text;
use super::sentences::sentences;
use super::AnalysisError;
use crate::models::{Article, KwicMatch};

/// How many matches a single sentence may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Emit only the leftmost match of each sentence. This under-counts
    /// sentences that carry several terms; turn it off to get one record per
    /// distinct term found in the sentence.
    pub first_match_only: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            first_match_only: true,
        }
    }
}

impl MatchPolicy {
    pub fn all_matches() -> Self {
        Self {
            first_match_only: false,
        }
    }
}

/// Normalizes articles, splits them into sentences and emits one
/// [`KwicMatch`] per matched (sentence, term) pair.
#[derive(Debug, Clone)]
pub struct KwicExtractor {
    matcher: TermMatcher,
    policy: MatchPolicy,
}

impl KwicExtractor {
    pub fn new(lexicon: &Lexicon, policy: MatchPolicy) -> Result<Self, AnalysisError> {
        Ok(Self {
            matcher: TermMatcher::new(lexicon)?,
            policy,
        })
    }

    /// Matches for every article, in article-then-sentence order
    #[instrument(skip_all, fields(articles = articles.len()))]
    pub fn extract(&self, articles: &[Article]) -> Vec<KwicMatch> {
        let matches: Vec<KwicMatch> = articles
            .iter()
            .flat_map(|article| self.extract_article(article))
            .collect();
        debug!("Extracted {} KWIC matches", matches.len());
        matches
    }

    /// Matches for a single article. A missing year is carried through as `None`.
    pub fn extract_article(&self, article: &Article) -> Vec<KwicMatch> {
        if self.matcher.is_empty() {
            return Vec::new();
        }
        let text = article_text(article);
        sentences(&text)
            .flat_map(|sentence| {
                self.extract_sentence(article.year, article.doi.as_deref(), sentence)
            })
            .collect()
    }

    /// Matches within one sentence. Sentences without a match give nothing.
    pub fn extract_sentence(
        &self,
        year: Option<i32>,
        doi: Option<&str>,
        sentence: &str,
    ) -> Vec<KwicMatch> {
        let hits = if self.policy.first_match_only {
            self.matcher.first_match(sentence).into_iter().collect()
        } else {
            self.matcher.all_matches(sentence)
        };

        hits.into_iter()
            .map(|(index, range)| KwicMatch {
                year,
                doi: doi.map(str::to_string),
                keyword: self.matcher.term(index).to_string(),
                sentence: sentence.to_string(),
                left_context: sentence[..range.start].trim().to_string(),
                right_context: sentence[range.end..].trim().to_string(),
            })
            .collect()
    }
}
