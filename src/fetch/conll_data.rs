// CoNLL-2012 data driver.
//
// Downloads the CoNLL-2012 archives, unpacks them into the data directory
// and runs the bundled skeleton2conll script, which fills the word columns
// of the skeleton files from a licensed OntoNotes 5.0 copy.
//
// All preconditions are checked before anything is created or downloaded.
// After that point the driver is fail-fast with no rollback: an error or
// interrupt leaves partially downloaded or extracted files behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

use super::{download, tools};
use crate::config::Config;

/// Where an archive is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveHost {
    /// The CoNLL-2012 shared task download area
    Conll,
    /// The reference scorer release area
    Scorer,
}

/// One of the fixed archives the driver downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConllArchive {
    pub host: ArchiveHost,
    /// Path relative to the host base URL
    pub path: &'static str,
}

impl ConllArchive {
    pub fn url(&self, config: &Config) -> String {
        let base = match self.host {
            ArchiveHost::Conll => &config.conll_url,
            ArchiveHost::Scorer => &config.scorer_archive_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), self.path)
    }
}

pub const CONLL_ARCHIVES: [ConllArchive; 6] = [
    ConllArchive { host: ArchiveHost::Conll, path: "conll-2012-train.v4.tar.gz" },
    ConllArchive { host: ArchiveHost::Conll, path: "conll-2012-development.v4.tar.gz" },
    ConllArchive { host: ArchiveHost::Conll, path: "test/conll-2012-test-key.tar.gz" },
    ConllArchive { host: ArchiveHost::Conll, path: "test/conll-2012-test-official.v9.tar.gz" },
    ConllArchive { host: ArchiveHost::Conll, path: "conll-2012-scripts.v3.tar.gz" },
    ConllArchive { host: ArchiveHost::Scorer, path: "reference-coreference-scorers.v8.01.tar.gz" },
];

/// Subpath of an OntoNotes 5.0 release that skeleton2conll reads from.
pub const ONTONOTES_DATA_SUBPATH: &str = "data/files/data";

/// The conversion script, relative to the data directory.
pub const SKELETON2CONLL: &str = "conll-2012/v3/scripts/skeleton2conll.sh";

/// Download, unpack and fill the CoNLL-2012 corpus.
pub async fn get_conll_data(config: &Config, ontonotes_dir: &Path, data_dir: &Path) -> Result<()> {
    check_interpreter(&config.python).await?;
    let ontonotes_data = check_ontonotes_dir(ontonotes_dir)?;

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    std::fs::create_dir_all(&config.downloads_dir).with_context(|| {
        format!(
            "Failed to create downloads directory: {}",
            config.downloads_dir.display()
        )
    })?;

    let client = reqwest::Client::new();
    let mut archives = Vec::with_capacity(CONLL_ARCHIVES.len());

    println!("\nDownloading CoNLL-2012 archives:");
    for archive in &CONLL_ARCHIVES {
        let url = archive.url(config);
        println!("  {}", archive.path);
        archives.push(download::download_into(&client, &url, &config.downloads_dir).await?);
    }

    println!("\nExtracting into {}...", data_dir.display());
    for archive in &archives {
        info!(archive = %archive.display(), "Extracting");
        tools::run(
            Command::new("tar")
                .arg("-xzf")
                .arg(archive)
                .arg("-C")
                .arg(data_dir),
        )
        .await?;
    }

    let script = data_dir.join(SKELETON2CONLL);
    println!("\nRunning skeleton2conll (this takes a while)...");
    tools::run(
        Command::new("bash")
            .arg(&script)
            .arg("-D")
            .arg(&ontonotes_data)
            .arg(data_dir.join("conll-2012")),
    )
    .await?;

    Ok(())
}

/// Validate the OntoNotes release directory.
/// Returns the nested data path handed to skeleton2conll.
pub fn check_ontonotes_dir(ontonotes_dir: &Path) -> Result<PathBuf> {
    if !ontonotes_dir.is_dir() {
        anyhow::bail!("Invalid OntoNotes path: {}", ontonotes_dir.display());
    }
    let data = ontonotes_dir.join(ONTONOTES_DATA_SUBPATH);
    if !data.is_dir() {
        anyhow::bail!(
            "Invalid OntoNotes path: {} does not contain {}",
            ontonotes_dir.display(),
            ONTONOTES_DATA_SUBPATH
        );
    }
    Ok(data)
}

/// The CoNLL-2012 scripts only run under Python 2.
pub async fn check_interpreter(python: &str) -> Result<()> {
    let output = Command::new(python)
        .arg("--version")
        .output()
        .await
        .with_context(|| format!("Failed to run `{python} --version`"))?;

    // Python 2 prints its version to stderr, Python 3 to stdout.
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    match parse_python_version(&text) {
        Some((2, _)) => Ok(()),
        Some((major, minor)) => anyhow::bail!(
            "conll-2012 scripts require Python 2, found {major}.{minor} ({python}).\n\
             Set COREFPREP_PYTHON to a Python 2 interpreter."
        ),
        None => anyhow::bail!(
            "conll-2012 scripts require Python 2, found an unrecognized version: {}",
            text.trim()
        ),
    }
}

/// Parse `Python X.Y[.Z]` into `(X, Y)`.
pub fn parse_python_version(text: &str) -> Option<(u32, u32)> {
    let version = text.split_whitespace().skip_while(|w| *w != "Python").nth(1)?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .map(|m| m.chars().take_while(char::is_ascii_digit).collect::<String>())
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    Some((major, minor))
}
