// HTTP download helper shared by the third-party fetcher and the
// CoNLL-2012 archive driver.
//
// Files are streamed to disk chunk by chunk so the ~500 MB parser archive
// never sits in memory. There is no retry: a failed download aborts the
// whole command and leaves whatever was written so far.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Last path segment of a URL, used as the local file name.
pub fn file_name_from_url(url: &str) -> Result<&str> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    match trimmed.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => anyhow::bail!("Cannot derive a file name from URL: {url}"),
    }
}

/// Download `url` into `dir`, keeping the URL's file name.
/// Returns the path of the written file.
pub async fn download_into(client: &reqwest::Client, url: &str, dir: &Path) -> Result<PathBuf> {
    let dest = dir.join(file_name_from_url(url)?);
    download_file(client, url, &dest).await?;
    Ok(dest)
}

/// Download a single file from a URL to a local path, with a progress bar.
pub async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    };

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read response body from {url}"))?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        pb.inc(chunk.len() as u64);
    }
    file.flush()
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    pb.finish_and_clear();

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}
