// Third-party fetcher: the reference coreference scorer and the Stanford
// parser jar used to convert constituency trees to dependencies.
//
// Not idempotent: the scorer checkout must not exist yet, so running the
// fetcher twice without cleaning up fails on the second run.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

use super::{download, tools};
use crate::config::{Config, PARSER_JAR};

/// Fetch the scorer and the parser jar into the configured directories.
pub async fn fetch_third_party(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.downloads_dir).with_context(|| {
        format!(
            "Failed to create downloads directory: {}",
            config.downloads_dir.display()
        )
    })?;

    ensure_absent(&config.scorer_dir)?;

    println!("\nReference coreference scorer:");
    println!("  Cloning {}...", config.scorer_repo);
    info!(repo = %config.scorer_repo, "Cloning scorer");
    tools::run(
        Command::new("git")
            .arg("clone")
            .arg(&config.scorer_repo)
            .arg(&config.scorer_dir),
    )
    .await?;

    println!("\nStanford parser:");
    println!("  Downloading {}...", config.parser_url);
    let client = reqwest::Client::new();
    let archive = download::download_into(&client, &config.parser_url, &config.downloads_dir).await?;

    println!("  Extracting {}...", PARSER_JAR);
    extract_parser_jar(&archive, &config.downloads_dir).await?;

    Ok(())
}

/// Fail if the scorer checkout already exists.
pub fn ensure_absent(scorer_dir: &Path) -> Result<()> {
    if scorer_dir.exists() {
        anyhow::bail!(
            "{} already exists; remove it before fetching again",
            scorer_dir.display()
        );
    }
    Ok(())
}

/// Pull `stanford-parser.jar` out of the parser zip, flattening its directory.
async fn extract_parser_jar(archive: &Path, dest: &Path) -> Result<()> {
    tools::run(
        Command::new("unzip")
            .args(["-j", "-o", "-q"])
            .arg(archive)
            .arg(format!("*/{PARSER_JAR}"))
            .arg("-d")
            .arg(dest),
    )
    .await?;

    let jar = dest.join(PARSER_JAR);
    if !jar.exists() {
        anyhow::bail!("{} did not contain {}", archive.display(), PARSER_JAR);
    }
    info!(jar = %jar.display(), "Parser jar ready");
    Ok(())
}
