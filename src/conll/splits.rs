// Data splits and corpus file discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Output language prefix of every jsonlines file.
pub const LANGUAGE: &str = "english";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSplit {
    Development,
    Test,
    Train,
}

impl DataSplit {
    pub const ALL: [DataSplit; 3] = [DataSplit::Development, DataSplit::Test, DataSplit::Train];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataSplit::Development => "development",
            DataSplit::Test => "test",
            DataSplit::Train => "train",
        }
    }

    /// `english_<split><suffix>.jsonlines`
    pub fn jsonlines_name(&self, suffix: &str) -> String {
        format!("{LANGUAGE}_{}{suffix}.jsonlines", self.as_str())
    }
}

impl fmt::Display for DataSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All files under `dir`, recursively, sorted by name at each level.
pub fn files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        if path.is_dir() {
            files.extend(files_recursive(&path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

/// The `*gold_conll` files of every split under `<data_dir>/<split>/data/english`.
pub fn conll_files(data_dir: &Path) -> Result<Vec<(DataSplit, Vec<PathBuf>)>> {
    DataSplit::ALL
        .into_iter()
        .map(|split| {
            let dir = data_dir.join(split.as_str()).join("data").join(LANGUAGE);
            let files = files_recursive(&dir)?
                .into_iter()
                .filter(|p| p.to_string_lossy().ends_with("gold_conll"))
                .collect();
            Ok((split, files))
        })
        .collect()
}
