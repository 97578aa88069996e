//! Terminal output for survey results.
//!
//! Every record type renders three ways: a `comfy-table` table for people,
//! pretty JSON for other programs, and tab-separated plain text for
//! spreadsheets. Long contexts are truncated by display width in tables only.

use comfy_table::{Attribute, Cell, CellAlignment, Table};
use serde::Serialize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{FrequencyRecord, KwicMatch, SentimentRecord, WordFrequency};

/// Widest context shown in a table cell
const CONTEXT_WIDTH: usize = 40;
const SENTENCE_WIDTH: usize = 60;

/// Output format for results
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    #[default]
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Tab-separated text with a header line
    Plain,
}

impl OutputFormat {
    /// Replace `Auto` with the concrete format for the current stdout
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// A record that can be laid out as a table row.
pub trait Tabular: Serialize {
    fn headers() -> Vec<&'static str>;

    /// Full, untruncated cell values
    fn row(&self) -> Vec<String>;

    /// Cells for terminal display; defaults to [`Tabular::row`]
    fn table_row(&self) -> Vec<Cell> {
        self.row().into_iter().map(Cell::new).collect()
    }
}

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "n.d.".to_string())
}

impl Tabular for KwicMatch {
    fn headers() -> Vec<&'static str> {
        vec!["Year", "Left context", "Keyword", "Right context", "Sentence", "DOI"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            year_label(self.year),
            self.left_context.clone(),
            self.keyword.clone(),
            self.right_context.clone(),
            self.sentence.clone(),
            self.doi.clone().unwrap_or_default(),
        ]
    }

    fn table_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(year_label(self.year)),
            Cell::new(truncate_start(&self.left_context, CONTEXT_WIDTH))
                .set_alignment(CellAlignment::Right),
            Cell::new(&self.keyword).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&self.right_context, CONTEXT_WIDTH)),
            Cell::new(truncate_with_ellipsis(&self.sentence, SENTENCE_WIDTH)),
            Cell::new(self.doi.as_deref().unwrap_or("")),
        ]
    }
}

impl Tabular for FrequencyRecord {
    fn headers() -> Vec<&'static str> {
        vec!["Year", "Pejorative hits", "Documents", "Hits per doc"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.pejorative_hits.to_string(),
            self.total_docs.to_string(),
            format!("{:.4}", self.freq_per_doc),
        ]
    }
}

impl Tabular for WordFrequency {
    fn headers() -> Vec<&'static str> {
        vec!["Period", "Word", "Count", "Share"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.period.to_string(),
            self.word.clone(),
            self.count.to_string(),
            format!("{:.4}", self.share),
        ]
    }
}

impl Tabular for SentimentRecord {
    fn headers() -> Vec<&'static str> {
        vec![
            "Period",
            "Documents",
            "Scored tokens",
            "Positive",
            "Negative",
            "Net score",
            "Score per doc",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.period.to_string(),
            self.docs.to_string(),
            self.scored_tokens.to_string(),
            self.positive.to_string(),
            self.negative.to_string(),
            self.net_score.to_string(),
            format!("{:.4}", self.score_per_doc),
        ]
    }
}

/// Render records in the given format. `Auto` is resolved against stdout.
pub fn render<T: Tabular>(records: &[T], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format.resolve() {
        OutputFormat::Json => serde_json::to_string_pretty(records),
        OutputFormat::Plain => Ok(to_tsv(records)),
        _ => Ok(to_table(records)),
    }
}

/// Render records as a `comfy-table` table
pub fn to_table<T: Tabular>(records: &[T]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(T::headers());
    for record in records {
        table.add_row(record.table_row());
    }
    table.to_string()
}

/// Render records as tab-separated lines with a header
pub fn to_tsv<T: Tabular>(records: &[T]) -> String {
    let mut out = T::headers().join("\t");
    out.push('\n');
    for record in records {
        let cells: Vec<String> = record.row().iter().map(|c| tsv_cell(c)).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

fn tsv_cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn char_width(c: char) -> usize {
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }
    if unicode_width::UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut width = 0;
    let kept: String = text
        .chars()
        .take_while(|c| {
            width += char_width(*c);
            width <= max_width - 3
        })
        .collect();
    format!("{}...", kept)
}

/// Like [`truncate_with_ellipsis`] but keeps the end of the text, so a left
/// context stays adjacent to its keyword.
pub fn truncate_start(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }
    if unicode_width::UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut width = 0;
    let mut kept: Vec<char> = text
        .chars()
        .rev()
        .take_while(|c| {
            width += char_width(*c);
            width <= max_width - 3
        })
        .collect();
    kept.reverse();
    format!("...{}", kept.into_iter().collect::<String>())
}

/// Spinner shown while articles are fetched.
pub struct FetchProgress {
    pb: indicatif::ProgressBar,
}

impl FetchProgress {
    /// Create a spinner; `hidden` suppresses all drawing (for `--quiet` or
    /// non-terminal output)
    pub fn new(msg: &str, hidden: bool) -> Self {
        let pb = if hidden {
            indicatif::ProgressBar::hidden()
        } else {
            indicatif::ProgressBar::new_spinner()
        };
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.finish_with_message(format!("✓ {}", msg));
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.finish_with_message(format!("✗ {}", msg));
    }
}
