//! Lexicon-based sentiment scoring over time.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::instrument;

use super::aggregate::TimeBucket;
use super::normalize::article_text;
use super::words::tokenize;
use super::AnalysisError;
use crate::models::{Article, SentimentRecord};

/// Word-to-score table.
///
/// The file format is one `word<TAB>value` or `word,value` entry per line.
/// `value` is an integer score or `positive`/`negative` (scored +1/-1).
#[derive(Debug, Clone, Default)]
pub struct SentimentLexicon {
    scores: HashMap<String, i32>,
}

/// Sentiment of one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextSentiment {
    pub scored_tokens: usize,
    pub positive: usize,
    pub negative: usize,
    pub score: i64,
}

impl SentimentLexicon {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: AsRef<str>,
    {
        Self {
            scores: entries
                .into_iter()
                .map(|(word, score)| (word.as_ref().trim().to_lowercase(), score))
                .collect(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, AnalysisError> {
        let mut scores = HashMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |message: &str| AnalysisError::LexiconFormat {
                line: index + 1,
                message: message.to_string(),
            };

            let (word, value) = line
                .split_once('\t')
                .or_else(|| line.split_once(','))
                .ok_or_else(|| malformed("expected `word<TAB>value` or `word,value`"))?;
            let word = word.trim().to_lowercase();
            if word.is_empty() {
                return Err(malformed("empty word"));
            }

            let score = match value.trim().to_lowercase().as_str() {
                "positive" => 1,
                "negative" => -1,
                other => other
                    .parse::<i32>()
                    .map_err(|_| malformed(&format!("unrecognized score '{other}'")))?,
            };
            scores.insert(word, score);
        }
        Ok(Self { scores })
    }

    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn score(&self, word: &str) -> Option<i32> {
        self.scores.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score already-normalized text token by token
    pub fn score_text(&self, text: &str) -> TextSentiment {
        let mut sentiment = TextSentiment::default();
        for score in tokenize(text).filter_map(|word| self.score(word)) {
            sentiment.scored_tokens += 1;
            sentiment.score += i64::from(score);
            match score.signum() {
                1 => sentiment.positive += 1,
                -1 => sentiment.negative += 1,
                _ => {}
            }
        }
        sentiment
    }
}

/// Sentiment totals per period. Articles without a year are skipped.
#[instrument(skip(articles, lexicon), fields(articles = articles.len()))]
pub fn sentiment_by_bucket(
    articles: &[Article],
    lexicon: &SentimentLexicon,
    bucket: TimeBucket,
) -> Vec<SentimentRecord> {
    let mut periods: BTreeMap<i32, (usize, TextSentiment)> = BTreeMap::new();

    for article in articles {
        let Some(year) = article.year else {
            continue;
        };
        let scored = lexicon.score_text(&article_text(article));
        let (docs, total) = periods.entry(bucket.key(year)).or_default();
        *docs += 1;
        total.scored_tokens += scored.scored_tokens;
        total.positive += scored.positive;
        total.negative += scored.negative;
        total.score += scored.score;
    }

    periods
        .into_iter()
        .map(|(period, (docs, total))| SentimentRecord {
            period,
            docs,
            scored_tokens: total.scored_tokens,
            positive: total.positive,
            negative: total.negative,
            net_score: total.score,
            score_per_doc: total.score as f64 / docs as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleBuilder;

    #[test]
    fn test_parse_mixed_formats() {
        let lexicon = SentimentLexicon::parse(
            "# bing-style and afinn-style rows\nhealthy\tpositive\nabnormal,negative\nsevere\t-3\n\n",
        )
        .unwrap();

        assert_eq!(lexicon.len(), 3);
        assert_eq!(lexicon.score("healthy"), Some(1));
        assert_eq!(lexicon.score("abnormal"), Some(-1));
        assert_eq!(lexicon.score("severe"), Some(-3));
        assert_eq!(lexicon.score("neutral"), None);
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = SentimentLexicon::parse("good\t1\nbad-line-without-value\n").unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconFormat { line: 2, .. }));

        let err = SentimentLexicon::parse("good\tgreat\n").unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconFormat { line: 1, .. }));
    }

    #[test]
    fn test_score_text() {
        let lexicon = SentimentLexicon::new([("healthy", 2), ("abnormal", -1), ("fine", 0)]);
        let sentiment = lexicon.score_text("healthy and abnormal and abnormal but fine");
        assert_eq!(
            sentiment,
            TextSentiment {
                scored_tokens: 4,
                positive: 1,
                negative: 2,
                score: 0,
            }
        );
    }

    #[test]
    fn test_sentiment_totals_match_article_scores() {
        let lexicon = SentimentLexicon::new([("healthy", 1), ("abnormal", -2)]);
        let articles = vec![
            ArticleBuilder::new("Healthy")
                .abstract_text("healthy outcomes")
                .year(1961)
                .build(),
            ArticleBuilder::new("Abnormal")
                .abstract_text("an abnormal finding")
                .year(1968)
                .build(),
            ArticleBuilder::new("Abnormal").year(1972).build(),
            ArticleBuilder::new("Abnormal undated").build(),
        ];

        let rows = sentiment_by_bucket(&articles, &lexicon, TimeBucket::Decade);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].period, 1960);
        assert_eq!(rows[0].docs, 2);
        assert_eq!(rows[0].positive, 2);
        assert_eq!(rows[0].negative, 2);
        assert_eq!(rows[0].net_score, 2 - 4);
        assert!((rows[0].score_per_doc + 1.0).abs() < 1e-9);

        let expected: i64 = articles
            .iter()
            .filter(|a| a.year.is_some())
            .map(|a| lexicon.score_text(&article_text(a)).score)
            .sum();
        let total: i64 = rows.iter().map(|r| r.net_score).sum();
        assert_eq!(total, expected);
    }
}
