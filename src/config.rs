use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default location of the CoNLL-2012 archives.
pub const DEFAULT_CONLL_URL: &str = "http://conll.cemantix.org/2012/download";

/// Default location of the packaged reference scorer archive.
pub const DEFAULT_SCORER_ARCHIVE_URL: &str = "http://conll.cemantix.org/download";

/// Default git repository of the reference coreference scorers.
pub const DEFAULT_SCORER_REPO: &str = "https://github.com/conll/reference-coreference-scorers";

/// Default Stanford parser archive (provides the constituency → dependency converter).
pub const DEFAULT_PARSER_URL: &str =
    "https://nlp.stanford.edu/software/stanford-parser-4.2.0.zip";

/// Name of the parser jar inside the downloads directory.
pub const PARSER_JAR: &str = "stanford-parser.jar";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so every
/// location and external tool can be overridden without touching the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where third-party artefacts and archives are downloaded to
    pub downloads_dir: PathBuf,
    /// Checkout of the reference coreference scorers (contains scorer.pl)
    pub scorer_dir: PathBuf,
    pub scorer_repo: String,
    pub parser_url: String,
    pub conll_url: String,
    pub scorer_archive_url: String,
    /// Interpreter the conll-2012 skeleton scripts run under (must be Python 2)
    pub python: String,
    pub java: String,
    pub perl: String,
    /// Directory holding the converted jsonlines files
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            scorer_dir: PathBuf::from("reference-coreference-scorers"),
            scorer_repo: DEFAULT_SCORER_REPO.to_string(),
            parser_url: DEFAULT_PARSER_URL.to_string(),
            conll_url: DEFAULT_CONLL_URL.to_string(),
            scorer_archive_url: DEFAULT_SCORER_ARCHIVE_URL.to_string(),
            python: "python".to_string(),
            java: "java".to_string(),
            perl: "perl".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default, so loading never fails on a clean machine.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            downloads_dir: env::var("COREFPREP_DOWNLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.downloads_dir),
            scorer_dir: env::var("COREFPREP_SCORER_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scorer_dir),
            scorer_repo: env::var("COREFPREP_SCORER_REPO").unwrap_or(defaults.scorer_repo),
            parser_url: env::var("COREFPREP_PARSER_URL").unwrap_or(defaults.parser_url),
            conll_url: env::var("COREFPREP_CONLL_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.conll_url),
            scorer_archive_url: env::var("COREFPREP_SCORER_ARCHIVE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.scorer_archive_url),
            python: env::var("COREFPREP_PYTHON").unwrap_or(defaults.python),
            java: env::var("COREFPREP_JAVA").unwrap_or(defaults.java),
            perl: env::var("COREFPREP_PERL").unwrap_or(defaults.perl),
            data_dir: env::var("COREFPREP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        })
    }

    /// Path of the parser jar produced by `fetch-third-party`.
    pub fn parser_jar(&self) -> PathBuf {
        self.downloads_dir.join(PARSER_JAR)
    }

    /// Path of the reference scorer script.
    pub fn scorer_script(&self) -> PathBuf {
        self.scorer_dir.join("scorer.pl")
    }

    /// Check that the parser jar has been fetched.
    /// Call this before converting constituency trees to dependencies.
    pub fn require_parser(&self) -> Result<()> {
        let jar = self.parser_jar();
        if !jar.exists() {
            anyhow::bail!(
                "Parser jar not found at {}\n\
                 Run `corefprep fetch-third-party` to download it.",
                jar.display()
            );
        }
        Ok(())
    }

    /// Check that the reference scorer is available.
    pub fn require_scorer(&self) -> Result<()> {
        let script = self.scorer_script();
        if !script.exists() {
            anyhow::bail!(
                "Reference scorer not found at {}\n\
                 Run `corefprep fetch-third-party` to clone it.",
                script.display()
            );
        }
        Ok(())
    }
}
