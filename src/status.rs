// Preparation status display: which artefacts exist and how big they are.

use std::path::Path;

use colored::Colorize;

use crate::config::Config;
use crate::conll::splits::DataSplit;

/// Display preparation status to the terminal.
pub fn show(config: &Config) {
    println!("{}", "Third-party tools:".bold());
    show_path("Downloads", &config.downloads_dir);
    show_path("Scorer", &config.scorer_script());
    show_path("Parser jar", &config.parser_jar());

    println!("\n{}", "Corpus:".bold());
    show_path("CoNLL-2012", &config.data_dir.join("conll-2012"));
    for split in DataSplit::ALL {
        show_path(
            &format!("{split} documents"),
            &config.data_dir.join(split.jsonlines_name("")),
        );
        show_path(
            &format!("{split} heads"),
            &config.data_dir.join(split.jsonlines_name("_head")),
        );
    }
}

fn show_path(label: &str, path: &Path) {
    let state = match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => "present".green().to_string(),
        Ok(meta) => format!("{} ({})", "present".green(), format_bytes(meta.len())),
        Err(_) => "missing".yellow().to_string(),
    };
    println!("  {:<24} {:<48} {}", label, path.display(), state);
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
