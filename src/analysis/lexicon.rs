//! Term lexicons and the whole-word matcher built from them.

use regex::{Regex, RegexBuilder};
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use super::normalize::normalize_text;
use super::AnalysisError;

/// An ordered set of terms.
///
/// Terms are normalized the same way article text is (lower-cased, markup
/// stripped, whitespace collapsed). Empty terms are dropped and a repeated
/// term keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    terms: Vec<String>,
}

impl Lexicon {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        lexicon.extend(terms);
        lexicon
    }

    /// Parse one term per line; blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load a term-per-line file
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&content))
    }

    /// Append terms, skipping empties and duplicates
    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            let term = normalize_text(term.as_ref());
            if !term.is_empty() && !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Case-insensitive whole-word matcher over a [`Lexicon`].
///
/// A term occurrence counts only when the characters on either side of it are
/// not word characters. Terms that begin or end with punctuation (`c++`) are
/// handled by switching `\b` for `\B` on that side.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    terms: Vec<String>,
    patterns: Vec<Regex>,
    combined: Option<Regex>,
}

impl TermMatcher {
    pub fn new(lexicon: &Lexicon) -> Result<Self, AnalysisError> {
        let sources: Vec<String> = lexicon.terms().iter().map(|t| term_pattern(t)).collect();

        let patterns = lexicon
            .terms()
            .iter()
            .zip(&sources)
            .map(|(term, source)| compile(source).map_err(|e| invalid(term, e)))
            .collect::<Result<Vec<_>, _>>()?;

        // One capture group per term, in lexicon order. Leftmost-first
        // alternation gives ties at the same offset to the earlier term.
        let combined = if sources.is_empty() {
            None
        } else {
            let alternation = sources
                .iter()
                .map(|s| format!("({s})"))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&alternation).map_err(|e| invalid("<combined lexicon>", e))?)
        };

        Ok(Self {
            terms: lexicon.terms().to_vec(),
            patterns,
            combined,
        })
    }

    /// The normalized term at `index`
    pub fn term(&self, index: usize) -> &str {
        &self.terms[index]
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether any term occurs in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.combined.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Leftmost occurrence of any term as `(term index, byte range)`
    pub fn first_match(&self, text: &str) -> Option<(usize, Range<usize>)> {
        let caps = self.combined.as_ref()?.captures(text)?;
        caps.iter()
            .skip(1)
            .enumerate()
            .find_map(|(index, group)| group.map(|m| (index, m.range())))
    }

    /// First occurrence of every term that occurs, ordered by offset and then
    /// by lexicon position
    pub fn all_matches(&self, text: &str) -> Vec<(usize, Range<usize>)> {
        let mut found: Vec<(usize, Range<usize>)> = self
            .patterns
            .iter()
            .enumerate()
            .filter_map(|(index, re)| re.find(text).map(|m| (index, m.range())))
            .collect();
        found.sort_by_key(|(index, range)| (range.start, *index));
        found
    }

    /// First whole-word occurrence of the term at `index`
    pub fn find_term(&self, index: usize, text: &str) -> Option<Range<usize>> {
        self.patterns.get(index)?.find(text).map(|m| m.range())
    }
}

/// Whether `c` is in the class `\b` treats as a word character
fn is_word_char(c: char) -> bool {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let mut buf = [0u8; 4];
    WORD.get_or_init(|| Regex::new(r"^\w$").expect("word class pattern is valid"))
        .is_match(c.encode_utf8(&mut buf))
}

fn term_pattern(term: &str) -> String {
    let lead = if term.chars().next().is_some_and(is_word_char) {
        r"\b"
    } else {
        r"\B"
    };
    let trail = if term.chars().last().is_some_and(is_word_char) {
        r"\b"
    } else {
        r"\B"
    };
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!("{lead}{body}{trail}")
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn invalid(term: &str, source: regex::Error) -> AnalysisError {
    AnalysisError::InvalidPattern {
        term: term.to_string(),
        source,
    }
}
