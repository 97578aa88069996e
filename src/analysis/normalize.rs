//! Text normalization applied before segmentation and matching.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Article;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Lower-case, replace `<...>` markup with a space, collapse whitespace runs
/// and trim.
///
/// Running this on its own output returns the same string.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let untagged = tag_pattern().replace_all(&lowered, " ");
    untagged.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized `title + " " + abstract` of an article
pub fn article_text(article: &Article) -> String {
    normalize_text(&article.raw_text())
}
