// CoNLL score: the average F1 of MUC, CEAFe and B³ as reported by the
// reference scorer for one experiment checkpoint.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex_lite::Regex;
use tokio::process::Command;
use tracing::info;

use crate::config::Config;
use crate::fetch::tools;

/// Metrics averaged into the CoNLL score, in reporting order.
pub const METRICS: [&str; 3] = ["muc", "ceafe", "bcub"];

static F1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"F1:\s*([0-9.]+)%").expect("valid regex"));

/// Gold and predicted CoNLL files written for an evaluated epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreFiles {
    pub gold: PathBuf,
    pub pred: PathBuf,
}

impl ScoreFiles {
    /// `<log_dir>/<section>_<split>_e<epoch>.{gold,pred}.conll`
    pub fn locate(log_dir: &Path, section: &str, split: &str, epoch: u32) -> Self {
        let prefix = format!("{section}_{split}_e{epoch}");
        Self {
            gold: log_dir.join(format!("{prefix}.gold.conll")),
            pred: log_dir.join(format!("{prefix}.pred.conll")),
        }
    }

    pub fn require(&self) -> Result<()> {
        for path in [&self.gold, &self.pred] {
            if !path.exists() {
                anyhow::bail!("{} not found", path.display());
            }
        }
        Ok(())
    }
}

/// One metric's F1 plus the overall average.
#[derive(Debug, Clone, PartialEq)]
pub struct ConllScore {
    pub metrics: Vec<(&'static str, f64)>,
}

impl ConllScore {
    pub fn average(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        self.metrics.iter().map(|(_, f1)| f1).sum::<f64>() / self.metrics.len() as f64
    }
}

/// Pull the F1 out of scorer output.
///
/// The scorer ends with a summary block whose second-to-last line holds
/// the overall F1.
pub fn extract_f1(stdout: &str) -> Result<f64> {
    let lines: Vec<&str> = stdout.lines().collect();
    let Some(line) = lines.len().checked_sub(2).map(|i| lines[i]) else {
        anyhow::bail!("Scorer output is too short to contain an F1 line");
    };
    let caps = F1_PATTERN
        .captures(line)
        .ok_or_else(|| anyhow::anyhow!("No F1 found in scorer line: {line:?}"))?;
    caps[1]
        .parse()
        .with_context(|| format!("Invalid F1 value {:?}", &caps[1]))
}

/// Run the reference scorer for every metric.
pub async fn score(config: &Config, files: &ScoreFiles) -> Result<ConllScore> {
    let script = config.scorer_script();
    let mut metrics = Vec::with_capacity(METRICS.len());

    for metric in METRICS {
        let output = tools::capture(
            Command::new(&config.perl)
                .arg(&script)
                .arg(metric)
                .arg(&files.gold)
                .arg(&files.pred),
        )
        .await?;
        let f1 = extract_f1(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("Failed to read {metric} score"))?;
        info!(metric, f1, "Scored");
        metrics.push((metric, f1));
    }

    Ok(ConllScore { metrics })
}
