// CoNLL-2012 → jsonlines conversion pipeline.
//
// For every gold_conll file of every split:
//   1. read the word lines and rebuild one constituency tree per sentence
//   2. write the trees under the temporary directory (mirroring the corpus)
//   3. convert them to dependencies (the slow step, run concurrently)
//   4. merge words, dependencies and coreference into a document
//   5. split the document into parts and append them to the split's output
//
// Files are converted with bounded concurrency but written in corpus order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::converter::DependencyConverter;
use super::deps::read_dep_sentences;
use super::document::{build_document, split_parts, DocumentPart};
use super::reader::read_sentences;
use super::splits::{conll_files, DataSplit};
use super::trees::trees_text;
use crate::jsonl::JsonlWriter;

/// Per-split result of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub split: DataSplit,
    pub files: usize,
    pub parts: usize,
    pub output: PathBuf,
}

/// Location of the annotated data inside a CoNLL-2012 directory.
pub fn corpus_data_dir(conll_dir: &Path) -> PathBuf {
    conll_dir.join("v4").join("data")
}

/// Delete and recreate the temporary directory.
pub fn reset_tmp_dir(tmp_dir: &Path) -> Result<()> {
    if tmp_dir.exists() {
        std::fs::remove_dir_all(tmp_dir)
            .with_context(|| format!("Failed to remove {}", tmp_dir.display()))?;
    }
    std::fs::create_dir_all(tmp_dir)
        .with_context(|| format!("Failed to create {}", tmp_dir.display()))
}

/// Convert the whole corpus. `tmp_dir` must already exist and be empty.
pub async fn convert_corpus(
    conll_dir: &Path,
    out_dir: &Path,
    tmp_dir: &Path,
    jobs: usize,
    converter: &dyn DependencyConverter,
) -> Result<Vec<SplitSummary>> {
    let data_dir = corpus_data_dir(conll_dir);
    let splits = conll_files(&data_dir)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut summaries = Vec::with_capacity(splits.len());
    for (split, files) in splits {
        info!(split = %split, files = files.len(), "Converting split");

        let output = out_dir.join(split.jsonlines_name(""));
        let mut writer = JsonlWriter::create(&output)?;
        let pb = progress_bar(split, files.len() as u64);

        let mut converted = stream::iter(files.iter())
            .map(|path| convert_file(&data_dir, tmp_dir, path, converter))
            .buffered(jobs.max(1));

        while let Some(parts) = converted.next().await {
            for part in parts? {
                writer.write(&part)?;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        let parts = writer.finish()?;
        println!("  {split}: {} files → {parts} documents", files.len());
        summaries.push(SplitSummary {
            split,
            files: files.len(),
            parts,
            output,
        });
    }

    Ok(summaries)
}

/// Convert one gold_conll file into its document parts.
pub async fn convert_file(
    data_dir: &Path,
    tmp_dir: &Path,
    path: &Path,
    converter: &dyn DependencyConverter,
) -> Result<Vec<DocumentPart>> {
    let source = path.display().to_string();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {source}"))?;
    let sentences = read_sentences(&text).with_context(|| format!("Failed to parse {source}"))?;

    let relative = path.strip_prefix(data_dir).unwrap_or(path);
    let tree_path = tmp_dir.join(relative);
    if tree_path.exists() {
        anyhow::bail!("{} already exists in the temporary directory", tree_path.display());
    }
    if let Some(parent) = tree_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&tree_path, trees_text(&sentences)?)
        .await
        .with_context(|| format!("Failed to write {}", tree_path.display()))?;

    let dep_text = converter
        .convert(&tree_path)
        .await
        .with_context(|| format!("Dependency conversion failed for {source}"))?;

    let mut dep_path = tree_path.into_os_string();
    dep_path.push("_dep");
    tokio::fs::write(&dep_path, &dep_text)
        .await
        .with_context(|| format!("Failed to write {}", Path::new(&dep_path).display()))?;

    let parsed = read_dep_sentences(&dep_text)?;
    let doc = build_document(&source, &sentences, &parsed)?;
    let parts = split_parts(doc)?;
    debug!(file = %source, parts = parts.len(), "Converted");
    Ok(parts)
}

fn progress_bar(split: DataSplit, len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {prefix:>12} [{bar:40.cyan/blue}] {pos}/{len} docs ({eta})")
            .expect("valid template")
            .progress_chars("=> "),
    );
    pb.set_prefix(split.to_string());
    pb
}
