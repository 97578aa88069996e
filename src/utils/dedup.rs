//! DOI-based deduplication of fetched articles.

use std::collections::{HashMap, HashSet};

use crate::models::Article;

/// Which member of a duplicate group survives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateStrategy {
    /// Keep the first occurrence of each duplicate group
    First,
    /// Keep the last occurrence of each duplicate group
    Last,
}

/// Find articles sharing a DOI (compared case-insensitively)
///
/// Returns groups of article indices, each in input order. Articles without a
/// DOI are never grouped.
pub fn find_duplicates(articles: &[Article]) -> Vec<Vec<usize>> {
    let mut by_doi: HashMap<String, Vec<usize>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (index, article) in articles.iter().enumerate() {
        let Some(key) = article.doi_key() else {
            continue;
        };
        let group = by_doi.entry(key.clone()).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push(index);
    }

    order
        .into_iter()
        .filter_map(|key| by_doi.remove(&key))
        .filter(|group| group.len() > 1)
        .collect()
}

/// Remove articles with a repeated DOI, preserving input order of survivors
pub fn deduplicate_articles(articles: Vec<Article>, strategy: DuplicateStrategy) -> Vec<Article> {
    let groups = find_duplicates(&articles);

    if groups.is_empty() {
        return articles;
    }

    let mut to_remove: HashSet<usize> = HashSet::new();
    for group in groups {
        let keep = match strategy {
            DuplicateStrategy::First => group[0],
            DuplicateStrategy::Last => group[group.len() - 1],
        };
        to_remove.extend(group.into_iter().filter(|&idx| idx != keep));
    }

    tracing::debug!("Removing {} duplicate articles", to_remove.len());

    articles
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !to_remove.contains(idx))
        .map(|(_, article)| article)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleBuilder;

    fn article(title: &str, doi: Option<&str>) -> Article {
        let builder = ArticleBuilder::new(title);
        match doi {
            Some(doi) => builder.doi(doi).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn test_find_duplicates_case_insensitive() {
        let articles = vec![
            article("a", Some("10.1000/XYZ")),
            article("b", Some("10.1000/abc")),
            article("c", Some("10.1000/xyz")),
            article("d", None),
            article("e", None),
        ];

        assert_eq!(find_duplicates(&articles), vec![vec![0, 2]]);
    }

    #[test]
    fn test_dedup_keep_first() {
        let articles = vec![
            article("first", Some("10.1/a")),
            article("other", Some("10.1/b")),
            article("second", Some("10.1/A")),
        ];

        let unique = deduplicate_articles(articles, DuplicateStrategy::First);
        let titles: Vec<&str> = unique.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "other"]);
    }

    #[test]
    fn test_dedup_keep_last() {
        let articles = vec![
            article("first", Some("10.1/a")),
            article("other", Some("10.1/b")),
            article("second", Some("10.1/a")),
        ];

        let unique = deduplicate_articles(articles, DuplicateStrategy::Last);
        let titles: Vec<&str> = unique.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["other", "second"]);
    }

    #[test]
    fn test_articles_without_doi_are_kept() {
        let articles = vec![article("x", None), article("x", None), article("y", Some(" "))];
        assert_eq!(deduplicate_articles(articles, DuplicateStrategy::First).len(), 3);
    }
}
