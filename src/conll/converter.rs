// Constituency → dependency converter trait, a swap-ready abstraction.
//
// Production uses the Stanford parser's EnglishGrammaticalStructure, which
// needs a JVM and the parser jar. Tests plug in their own implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use crate::fetch::tools;

/// Turns a file of bracketed trees (one per line) into CoNLL-X text.
#[async_trait]
pub trait DependencyConverter: Send + Sync {
    async fn convert(&self, tree_file: &Path) -> Result<String>;
}

/// Basic, punctuation-keeping dependencies from the Stanford parser jar.
pub struct StanfordConverter {
    java: String,
    jar: PathBuf,
}

impl StanfordConverter {
    pub fn new(java: &str, jar: &Path) -> Self {
        Self {
            java: java.to_string(),
            jar: jar.to_path_buf(),
        }
    }

    fn command(&self, tree_file: &Path) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-cp")
            .arg(&self.jar)
            .arg("edu.stanford.nlp.trees.EnglishGrammaticalStructure")
            .args(["-basic", "-keepPunct", "-conllx", "-treeFile"])
            .arg(tree_file);
        cmd
    }
}

#[async_trait]
impl DependencyConverter for StanfordConverter {
    async fn convert(&self, tree_file: &Path) -> Result<String> {
        let output = tools::capture(&mut self.command(tree_file)).await?;
        String::from_utf8(output.stdout)
            .map_err(|_| anyhow::anyhow!("Converter output for {} is not UTF-8", tree_file.display()))
    }
}
