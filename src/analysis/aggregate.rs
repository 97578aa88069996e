//! Per-year pejorative-term frequency tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AnalysisError;
use crate::models::{Article, FrequencyRecord, KwicMatch};

/// Grouping key derived from a publication year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    #[default]
    Year,
    Decade,
}

impl TimeBucket {
    /// Bucket key for `year`; decades are keyed by their first year
    pub fn key(self, year: i32) -> i32 {
        match self {
            TimeBucket::Year => year,
            TimeBucket::Decade => year - year.rem_euclid(10),
        }
    }
}

/// Frequency of pejorative hits per publication year.
pub fn frequency_by_year(
    articles: &[Article],
    matches: &[KwicMatch],
) -> Result<Vec<FrequencyRecord>, AnalysisError> {
    frequency_by_bucket(articles, matches, TimeBucket::Year)
}

/// Frequency of pejorative hits per bucket.
///
/// Document totals come from every article with a year, hit counts from every
/// match with a year. Buckets with documents but no hits are reported with
/// zero hits. A bucket with hits but no documents cannot be divided and is an
/// error.
pub fn frequency_by_bucket(
    articles: &[Article],
    matches: &[KwicMatch],
    bucket: TimeBucket,
) -> Result<Vec<FrequencyRecord>, AnalysisError> {
    let mut totals: BTreeMap<i32, usize> = BTreeMap::new();
    for year in articles.iter().filter_map(|a| a.year) {
        *totals.entry(bucket.key(year)).or_default() += 1;
    }

    let mut hits: BTreeMap<i32, usize> = BTreeMap::new();
    for year in matches.iter().filter_map(|m| m.year) {
        *hits.entry(bucket.key(year)).or_default() += 1;
    }

    if let Some((&year, &count)) = hits.iter().find(|(year, _)| !totals.contains_key(year)) {
        return Err(AnalysisError::NoDocuments { year, hits: count });
    }

    Ok(totals
        .into_iter()
        .map(|(year, total_docs)| {
            let pejorative_hits = hits.get(&year).copied().unwrap_or(0);
            FrequencyRecord {
                year,
                pejorative_hits,
                total_docs,
                freq_per_doc: pejorative_hits as f64 / total_docs as f64,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleBuilder;

    fn article(year: Option<i32>) -> Article {
        let builder = ArticleBuilder::new("t");
        match year {
            Some(y) => builder.year(y).build(),
            None => builder.build(),
        }
    }

    fn hit(year: Option<i32>) -> KwicMatch {
        KwicMatch {
            year,
            doi: None,
            keyword: "abnormal".to_string(),
            sentence: "abnormal".to_string(),
            left_context: String::new(),
            right_context: String::new(),
        }
    }

    #[test]
    fn test_decade_key() {
        assert_eq!(TimeBucket::Decade.key(1987), 1980);
        assert_eq!(TimeBucket::Decade.key(1990), 1990);
        assert_eq!(TimeBucket::Decade.key(-5), -10);
        assert_eq!(TimeBucket::Year.key(1987), 1987);
    }

    #[test]
    fn test_outer_join_with_zero_hit_years() {
        let articles = vec![
            article(Some(1990)),
            article(Some(1990)),
            article(Some(1991)),
            article(None),
        ];
        let matches = vec![hit(Some(1990)), hit(Some(1990)), hit(Some(1990)), hit(None)];

        let records = frequency_by_year(&articles, &matches).unwrap();
        assert_eq!(
            records,
            vec![
                FrequencyRecord {
                    year: 1990,
                    pejorative_hits: 3,
                    total_docs: 2,
                    freq_per_doc: 1.5,
                },
                FrequencyRecord {
                    year: 1991,
                    pejorative_hits: 0,
                    total_docs: 1,
                    freq_per_doc: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_totals_reproduce_hits() {
        let articles: Vec<Article> = [1970, 1971, 1971, 1985, 1985, 1985]
            .into_iter()
            .map(|y| article(Some(y)))
            .collect();
        let matches: Vec<KwicMatch> = [1970, 1971, 1985, 1985, 1985, 1985, 1985]
            .into_iter()
            .map(|y| hit(Some(y)))
            .collect();

        for bucket in [TimeBucket::Year, TimeBucket::Decade] {
            let records = frequency_by_bucket(&articles, &matches, bucket).unwrap();
            let rebuilt: f64 = records
                .iter()
                .map(|r| r.freq_per_doc * r.total_docs as f64)
                .sum();
            assert_eq!(rebuilt.round() as usize, matches.len());
        }
    }

    #[test]
    fn test_years_without_articles_do_not_appear() {
        let articles = vec![article(Some(2000))];
        let records = frequency_by_year(&articles, &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2000);
    }

    #[test]
    fn test_hits_without_documents_is_an_error() {
        let articles = vec![article(Some(2000))];
        let matches = vec![hit(Some(1999))];
        let err = frequency_by_year(&articles, &matches).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NoDocuments {
                year: 1999,
                hits: 1
            }
        ));
    }

    #[test]
    fn test_decade_grouping() {
        let articles = vec![article(Some(1981)), article(Some(1989)), article(Some(1990))];
        let matches = vec![hit(Some(1989))];
        let records = frequency_by_bucket(&articles, &matches, TimeBucket::Decade).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 1980);
        assert_eq!(records[0].total_docs, 2);
        assert_eq!(records[0].pejorative_hits, 1);
        assert_eq!(records[1].year, 1990);
        assert_eq!(records[1].pejorative_hits, 0);
    }
}
