//! Word frequencies per period, with stop words removed.

use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;
use stop_words::{get, LANGUAGE};
use tracing::instrument;

use super::aggregate::TimeBucket;
use super::normalize::article_text;
use super::AnalysisError;
use crate::models::{Article, WordFrequency};

/// Words shorter than this are never counted
const MIN_WORD_CHARS: usize = 2;

/// A set of lower-case words to leave out of frequency counts
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The English list shipped with the `stop-words` crate
    pub fn english() -> Self {
        let mut stop_words = Self::default();
        stop_words.extend(get(LANGUAGE::English).iter().map(|w| w.to_string()));
        stop_words
    }

    /// Load a one-word-per-line file; `#` comments are skipped
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
        let mut stop_words = Self::default();
        stop_words.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        Ok(stop_words)
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn word_pattern() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| {
        Regex::new(r"\p{L}[\p{L}\p{N}'\u{2019}-]*").expect("word pattern is valid")
    })
}

/// Word tokens of already-normalized text, trailing apostrophes and hyphens removed
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['\'', '\u{2019}', '-']))
}

/// Count non-stop words per period and keep the `top_n` most frequent of each.
///
/// Ties are broken alphabetically. Articles without a year are skipped.
#[instrument(skip(articles, stop_words), fields(articles = articles.len()))]
pub fn word_frequencies(
    articles: &[Article],
    stop_words: &StopWords,
    bucket: TimeBucket,
    top_n: usize,
) -> Vec<WordFrequency> {
    let mut periods: BTreeMap<i32, HashMap<String, usize>> = BTreeMap::new();

    for article in articles {
        let Some(year) = article.year else {
            continue;
        };
        let counts = periods.entry(bucket.key(year)).or_default();
        let text = article_text(article);
        for word in tokenize(&text) {
            if word.chars().count() < MIN_WORD_CHARS || stop_words.contains(word) {
                continue;
            }
            *counts.entry(word.to_string()).or_default() += 1;
        }
    }

    periods
        .into_iter()
        .flat_map(|(period, counts)| {
            let total: usize = counts.values().sum();
            let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked
                .into_iter()
                .take(top_n)
                .map(move |(word, count)| WordFrequency {
                    period,
                    word,
                    count,
                    share: count as f64 / total as f64,
                })
        })
        .collect()
}
