//! Configuration file support for kwic-survey.
//!
//! Settings are read from a TOML file and can be overridden by environment
//! variables prefixed with `KWIC_SURVEY__`, using `__` between nested keys
//! (e.g. `KWIC_SURVEY__CROSSREF__MAILTO`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [crossref]
//! mailto = "you@example.org"
//! rows = 100
//! max_results_per_query = 1000
//! page_delay_ms = 250
//!
//! [search]
//! queries = ["sex differences", "gender differences"]
//! topics = ["sex", "gender"]
//! from_year = 1950
//! until_year = 2020
//! issn = "0033-2909"
//!
//! [lexicon]
//! terms = ["abnormal", "deviant", "biological anomaly"]
//! file = "pejoratives.txt"
//! first_match_only = true
//!
//! [analysis]
//! bucket = "decade"
//! top_words = 20
//! extra_stop_words = ["study", "results"]
//! sentiment_file = "afinn.tsv"
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// Name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "kwic-survey.toml";

/// Load configuration from a TOML file, then apply environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::Io(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("KWIC_SURVEY").separator("__"))
        .build()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Save configuration to a TOML file, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Look for a config file in the working directory, then in the user's
/// config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("kwic-survey").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TimeBucket;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[crossref]
mailto = "researcher@example.org"
rows = 50

[search]
queries = ["sex differences"]
from_year = 1960

[lexicon]
terms = ["deviant", "biological anomaly"]
first_match_only = false

[analysis]
bucket = "decade"
top_words = 5

[logging]
level = "debug"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(
            config.crossref.mailto,
            Some("researcher@example.org".to_string())
        );
        assert_eq!(config.crossref.rows, 50);
        assert_eq!(config.crossref.max_results_per_query, 1000);
        assert_eq!(config.search.queries, vec!["sex differences".to_string()]);
        assert_eq!(config.search.from_year, Some(1960));
        assert!(config.search.require_abstract);
        assert_eq!(config.lexicon.terms.len(), 2);
        assert!(!config.lexicon.first_match_only);
        assert_eq!(config.analysis.bucket, TimeBucket::Decade);
        assert_eq!(config.analysis.top_words, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.crossref.mailto = Some("saved@example.org".to_string());
        config.search.queries = vec!["gender".to_string()];
        config.analysis.bucket = TimeBucket::Decade;

        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.crossref.mailto, Some("saved@example.org".to_string()));
        assert_eq!(loaded.search.queries, vec!["gender".to_string()]);
        assert_eq!(loaded.analysis.bucket, TimeBucket::Decade);
        assert_eq!(loaded.lexicon, config.lexicon);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }
}
