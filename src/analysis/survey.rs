//! End-to-end survey over a fetched corpus.

use serde::Serialize;
use tracing::{info, instrument};

use super::aggregate::{frequency_by_bucket, TimeBucket};
use super::kwic::{KwicExtractor, MatchPolicy};
use super::lexicon::{Lexicon, TermMatcher};
use super::normalize::article_text;
use super::sentiment::{sentiment_by_bucket, SentimentLexicon};
use super::words::{word_frequencies, StopWords};
use super::AnalysisError;
use crate::config::Config;
use crate::models::{Article, FrequencyRecord, KwicMatch, SentimentRecord, WordFrequency};
use crate::utils::{deduplicate_articles, DuplicateStrategy};

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    /// Articles left after deduplication and topic filtering
    pub articles: usize,
    /// Of those, articles without a usable year
    pub undated: usize,
    pub matches: Vec<KwicMatch>,
    pub frequencies: Vec<FrequencyRecord>,
    pub words: Vec<WordFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Vec<SentimentRecord>>,
}

/// Configured analysis pipeline: dedup, topic filter, KWIC, frequencies,
/// word counts and optional sentiment.
#[derive(Debug, Clone)]
pub struct Survey {
    extractor: KwicExtractor,
    topics: Option<TermMatcher>,
    stop_words: StopWords,
    sentiment: Option<SentimentLexicon>,
    bucket: TimeBucket,
    top_words: usize,
}

impl Survey {
    pub fn new(extractor: KwicExtractor) -> Self {
        Self {
            extractor,
            topics: None,
            stop_words: StopWords::english(),
            sentiment: None,
            bucket: TimeBucket::Year,
            top_words: 20,
        }
    }

    /// Build from configuration, loading every referenced file
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        let mut lexicon = Lexicon::new(&config.lexicon.terms);
        if let Some(path) = &config.lexicon.file {
            lexicon.extend(Lexicon::from_file(path)?.terms());
        }
        let policy = MatchPolicy {
            first_match_only: config.lexicon.first_match_only,
        };
        let mut survey = Self::new(KwicExtractor::new(&lexicon, policy)?)
            .with_topics(&Lexicon::new(config.search.topic_terms()))?
            .with_bucket(config.analysis.bucket)
            .with_top_words(config.analysis.top_words);

        let mut stop_words = match &config.analysis.stop_words_file {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };
        stop_words.extend(&config.analysis.extra_stop_words);
        survey = survey.with_stop_words(stop_words);

        if let Some(path) = &config.analysis.sentiment_file {
            survey = survey.with_sentiment(SentimentLexicon::from_file(path)?);
        }

        info!(
            "Survey configured: {} lexicon terms, first_match_only={}, bucket={:?}",
            lexicon.len(),
            policy.first_match_only,
            config.analysis.bucket
        );
        Ok(survey)
    }

    /// Keep only articles mentioning one of these topical terms. An empty
    /// lexicon disables the filter.
    pub fn with_topics(mut self, topics: &Lexicon) -> Result<Self, AnalysisError> {
        self.topics = if topics.is_empty() {
            None
        } else {
            Some(TermMatcher::new(topics)?)
        };
        Ok(self)
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_sentiment(mut self, lexicon: SentimentLexicon) -> Self {
        self.sentiment = Some(lexicon);
        self
    }

    pub fn with_bucket(mut self, bucket: TimeBucket) -> Self {
        self.bucket = bucket;
        self
    }

    pub fn with_top_words(mut self, top_words: usize) -> Self {
        self.top_words = top_words;
        self
    }

    /// Deduplicate by DOI and apply the topic filter
    pub fn prepare(&self, articles: Vec<Article>) -> Vec<Article> {
        let articles = deduplicate_articles(articles, DuplicateStrategy::First);
        match &self.topics {
            Some(topics) => articles
                .into_iter()
                .filter(|article| topics.is_match(&article_text(article)))
                .collect(),
            None => articles,
        }
    }

    #[instrument(skip_all, fields(input = articles.len()))]
    pub fn run(&self, articles: Vec<Article>) -> Result<SurveyReport, AnalysisError> {
        let articles = self.prepare(articles);
        let undated = articles.iter().filter(|a| a.year.is_none()).count();
        info!(
            "Analyzing {} articles ({} without a publication year)",
            articles.len(),
            undated
        );

        let matches = self.extractor.extract(&articles);
        let frequencies = frequency_by_bucket(&articles, &matches, self.bucket)?;
        let words = word_frequencies(&articles, &self.stop_words, self.bucket, self.top_words);
        let sentiment = self
            .sentiment
            .as_ref()
            .map(|lexicon| sentiment_by_bucket(&articles, lexicon, self.bucket));

        Ok(SurveyReport {
            articles: articles.len(),
            undated,
            matches,
            frequencies,
            words,
            sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleBuilder;

    fn survey() -> Survey {
        let extractor =
            KwicExtractor::new(&Lexicon::new(["abnormal"]), MatchPolicy::default()).unwrap();
        Survey::new(extractor)
    }

    #[test]
    fn test_prepare_dedups_and_filters_topics() {
        let survey = survey().with_topics(&Lexicon::new(["sex"])).unwrap();
        let articles = vec![
            ArticleBuilder::new("Sex roles").doi("10.1/A").year(1980).build(),
            ArticleBuilder::new("Sex roles again").doi("10.1/a").year(1980).build(),
            ArticleBuilder::new("Sexuality").doi("10.1/b").year(1981).build(),
            ArticleBuilder::new("Nothing").abstract_text("on sex").build(),
        ];

        let kept = survey.prepare(articles);
        let titles: Vec<&str> = kept.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Sex roles", "Nothing"]);
    }

    #[test]
    fn test_run_produces_all_tables() {
        let survey = survey()
            .with_sentiment(SentimentLexicon::new([("abnormal", -1)]))
            .with_top_words(3);
        let articles = vec![
            ArticleBuilder::new("Abnormal traits")
                .abstract_text("An abnormal pattern. Another abnormal sentence.")
                .year(1990)
                .build(),
            ArticleBuilder::new("Plain").year(1991).build(),
            ArticleBuilder::new("Abnormal but undated").issued("n.d.").build(),
        ];

        let report = survey.run(articles).unwrap();
        assert_eq!(report.articles, 3);
        assert_eq!(report.undated, 1);
        assert_eq!(report.matches.len(), 3);
        assert_eq!(report.frequencies.len(), 2);
        assert_eq!(report.frequencies[0].pejorative_hits, 2);
        assert_eq!(report.frequencies[1].pejorative_hits, 0);
        assert!(!report.words.is_empty());
        let sentiment = report.sentiment.unwrap();
        assert_eq!(sentiment[0].net_score, -3);
    }
}
