use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use kwic_survey::analysis::{Survey, SurveyReport, TimeBucket};
use kwic_survey::config::{find_config_file, load_config, save_config, Config};
use kwic_survey::models::Article;
use kwic_survey::sources::{fetch_corpus, CrossRefSource, Source};
use kwic_survey::ui::{self, FetchProgress, OutputFormat};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// kwic-survey - Keyword-in-context survey of pejorative terms in journal abstracts
#[derive(Parser, Debug)]
#[command(name = "kwic-survey")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keyword-in-context, frequency and sentiment survey over CrossRef article metadata", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Grouping period for aggregated tables
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Bucket {
    Year,
    Decade,
}

/// Options shared by every analysis command
#[derive(Args, Debug, Default)]
struct AnalysisArgs {
    /// Articles JSON written by `fetch`; fetched from CrossRef when omitted
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Search query (repeatable); replaces the configured queries
    #[arg(long = "query")]
    queries: Vec<String>,

    /// Report every lexicon term found in a sentence, not only the first
    #[arg(long)]
    all_matches: bool,

    /// Group aggregated results by year or decade
    #[arg(long, value_enum)]
    bucket: Option<Bucket>,
}

impl AnalysisArgs {
    fn apply(&self, config: &mut Config) {
        if !self.queries.is_empty() {
            config.search.queries = self.queries.clone();
        }
        if self.all_matches {
            config.lexicon.first_match_only = false;
        }
        if let Some(bucket) = self.bucket {
            config.analysis.bucket = match bucket {
                Bucket::Year => TimeBucket::Year,
                Bucket::Decade => TimeBucket::Decade,
            };
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch articles for the configured queries and save them as JSON
    #[command(alias = "f")]
    Fetch {
        /// Search query (repeatable); replaces the configured queries
        #[arg(long = "query")]
        queries: Vec<String>,

        /// Where to write the articles
        #[arg(long, default_value = "articles.json")]
        out: PathBuf,
    },

    /// Keyword-in-context concordance of the lexicon terms
    #[command(alias = "k")]
    Kwic {
        #[command(flatten)]
        args: AnalysisArgs,
    },

    /// Pejorative-term hits per document over time
    #[command(alias = "freq")]
    Frequency {
        #[command(flatten)]
        args: AnalysisArgs,
    },

    /// Most frequent non-stop words per period
    #[command(alias = "w")]
    Words {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Words shown per period
        #[arg(long)]
        top: Option<usize>,
    },

    /// Lexicon-based sentiment per period
    Sentiment {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Sentiment lexicon (word<TAB>score per line)
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Run the whole survey and write every table to a directory
    Run {
        #[command(flatten)]
        args: AnalysisArgs,

        /// Output directory
        #[arg(long, default_value = "survey-output")]
        out_dir: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = "kwic-survey.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let (mut config, config_path) = if let Some(path) = &cli.config {
        let config = load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        (config, Some(path.clone()))
    } else if let Some(path) = find_config_file() {
        let config = load_config(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        (config, Some(path))
    } else {
        (Config::default(), None)
    };

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kwic_survey={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Fetch { queries, out } => {
            if !queries.is_empty() {
                config.search.queries = queries;
            }
            let articles = fetch_articles(&config, timeout, cli.quiet).await?;
            write_articles(&articles, &out)?;
            if !cli.quiet {
                eprintln!("Wrote {} articles to {}", articles.len(), out.display());
            }
        }
        Commands::Kwic { args } => {
            let report = survey(&args, &mut config, timeout, cli.quiet).await?;
            println!("{}", ui::render(&report.matches, cli.output)?);
        }
        Commands::Frequency { args } => {
            let report = survey(&args, &mut config, timeout, cli.quiet).await?;
            println!("{}", ui::render(&report.frequencies, cli.output)?);
        }
        Commands::Words { args, top } => {
            if let Some(top) = top {
                config.analysis.top_words = top;
            }
            let report = survey(&args, &mut config, timeout, cli.quiet).await?;
            println!("{}", ui::render(&report.words, cli.output)?);
        }
        Commands::Sentiment { args, lexicon } => {
            if lexicon.is_some() {
                config.analysis.sentiment_file = lexicon;
            }
            if config.analysis.sentiment_file.is_none() {
                bail!("No sentiment lexicon: pass --lexicon or set analysis.sentiment_file");
            }
            let report = survey(&args, &mut config, timeout, cli.quiet).await?;
            let records = report.sentiment.unwrap_or_default();
            println!("{}", ui::render(&records, cli.output)?);
        }
        Commands::Run { args, out_dir } => {
            let fetched = args.input.is_none();
            args.apply(&mut config);
            let articles = load_articles(&args, &config, timeout, cli.quiet).await?;
            if fetched {
                write_articles(&articles, &out_dir.join("articles.json"))?;
            }

            let report = Survey::from_config(&config)?.run(articles)?;
            write_report(&report, &out_dir)?;
            if !cli.quiet {
                eprintln!(
                    "{} articles, {} matches; tables written to {}",
                    report.articles,
                    report.matches.len(),
                    out_dir.display()
                );
            }
            println!("{}", ui::render(&report.frequencies, cli.output)?);
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config(&Config::default(), &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Apply command-line overrides, load or fetch the corpus and run the survey
async fn survey(
    args: &AnalysisArgs,
    config: &mut Config,
    timeout: Duration,
    quiet: bool,
) -> Result<SurveyReport> {
    args.apply(config);
    let survey = Survey::from_config(config).context("Invalid analysis configuration")?;
    let articles = load_articles(args, config, timeout, quiet).await?;
    Ok(survey.run(articles)?)
}

async fn load_articles(
    args: &AnalysisArgs,
    config: &Config,
    timeout: Duration,
    quiet: bool,
) -> Result<Vec<Article>> {
    match &args.input {
        Some(path) => read_articles(path),
        None => fetch_articles(config, timeout, quiet).await,
    }
}

async fn fetch_articles(config: &Config, timeout: Duration, quiet: bool) -> Result<Vec<Article>> {
    let queries = config.search.to_queries(&config.crossref);
    if queries.is_empty() {
        bail!("No search queries: pass --query or set search.queries in the config file");
    }

    let source = CrossRefSource::from_config(&config.crossref, timeout)
        .context("Failed to create CrossRef client")?;
    let progress = FetchProgress::new(
        &format!("Fetching {} queries from {}", queries.len(), source.name()),
        quiet || !std::io::stderr().is_terminal(),
    );

    let report = fetch_corpus(&source, &queries).await;
    if report.failed_queries.len() == queries.len() {
        progress.finish_with_error("All queries failed");
        bail!("All {} queries failed", queries.len());
    }

    progress.finish_with_success(&format!(
        "Fetched {} articles ({} queries failed)",
        report.articles.len(),
        report.failed_queries.len()
    ));
    Ok(report.articles)
}

fn read_articles(path: &Path) -> Result<Vec<Article>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of articles", path.display()))
}

fn write_articles(articles: &[Article], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(articles)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_report(report: &SurveyReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    std::fs::write(dir.join("kwic.tsv"), ui::to_tsv(&report.matches))?;
    std::fs::write(dir.join("frequency.tsv"), ui::to_tsv(&report.frequencies))?;
    std::fs::write(dir.join("words.tsv"), ui::to_tsv(&report.words))?;
    if let Some(sentiment) = &report.sentiment {
        std::fs::write(dir.join("sentiment.tsv"), ui::to_tsv(sentiment))?;
    }
    std::fs::write(dir.join("report.json"), serde_json::to_string_pretty(report)?)?;
    Ok(())
}
