use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use corefprep::config::Config;

/// corefprep: CoNLL-2012 coreference corpus preparation.
///
/// Fetches the reference scorer and parser, builds the CoNLL-2012 corpus
/// from an OntoNotes 5.0 release, converts it to jsonlines and scores
/// predictions.
#[derive(Parser)]
#[command(name = "corefprep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the reference scorer and download the Stanford parser jar
    FetchThirdParty,

    /// Download the CoNLL-2012 archives and fill them from OntoNotes 5.0
    GetConllData {
        /// Root of the OntoNotes 5.0 release (contains data/files/data)
        ontonotes_dir: PathBuf,
        /// Where the CoNLL-2012 data is extracted to
        data_dir: PathBuf,
    },

    /// Convert the CoNLL-2012 corpus to jsonlines documents
    Convert {
        /// The root directory of the conll-formatted corpus (contains v4/)
        conll_dir: PathBuf,

        /// Where the english_<split>.jsonlines files are written
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Directory for intermediate trees and dependencies
        #[arg(long, default_value = "temp")]
        tmp_dir: PathBuf,

        /// Keep the temporary directory after converting
        #[arg(long)]
        keep_tmp_dir: bool,

        /// Delete an existing temporary directory without asking
        #[arg(long, short = 'y')]
        yes: bool,

        /// Number of dependency conversions to run in parallel (default: CPU count)
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Reduce span clusters to head-word clusters
    Heads {
        /// Directory with english_<split>.jsonlines (default: COREFPREP_DATA_DIR or data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Compute the CoNLL score (average of MUC, CEAFe and B³ F1)
    Score {
        /// The name of the experiment
        section: String,
        /// The evaluated split
        #[arg(value_enum)]
        data_split: ScoreSplit,
        /// The evaluated epoch
        epoch: u32,
        /// Directory holding the gold and predicted conll files
        #[arg(long, default_value = "data/conll_logs")]
        log_dir: PathBuf,
    },

    /// Validate a jsonlines file of raw documents for prediction
    Check {
        file: PathBuf,
    },

    /// Show which preparation artefacts exist
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoreSplit {
    Train,
    Dev,
    Test,
}

impl ScoreSplit {
    fn as_str(self) -> &'static str {
        match self {
            ScoreSplit::Train => "train",
            ScoreSplit::Dev => "dev",
            ScoreSplit::Test => "test",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("corefprep=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::FetchThirdParty => {
            println!("Fetching third-party tools...");
            println!("  Destination: {}", config.downloads_dir.display());

            corefprep::fetch::third_party::fetch_third_party(&config).await?;

            println!("\n{}", "Third-party tools ready.".bold());
            println!("Next: corefprep get-conll-data ONTONOTES_DIR DATA_DIR");
        }

        Commands::GetConllData {
            ontonotes_dir,
            data_dir,
        } => {
            corefprep::fetch::conll_data::get_conll_data(&config, &ontonotes_dir, &data_dir)
                .await?;

            println!("\n{}", "CoNLL-2012 data ready.".bold());
            println!(
                "Next: corefprep convert {}",
                data_dir.join("conll-2012").display()
            );
        }

        Commands::Convert {
            conll_dir,
            out_dir,
            tmp_dir,
            keep_tmp_dir,
            yes,
            jobs,
        } => {
            config.require_parser()?;

            if tmp_dir.exists() && !yes && !confirm_delete(&tmp_dir)? {
                return Ok(());
            }
            corefprep::conll::convert::reset_tmp_dir(&tmp_dir)?;

            let jobs = jobs.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
            info!(jobs, "Converting constituents to dependencies");

            let converter = corefprep::conll::converter::StanfordConverter::new(
                &config.java,
                &config.parser_jar(),
            );

            println!("Building jsonlines...");
            let summaries = corefprep::conll::convert::convert_corpus(
                &conll_dir,
                &out_dir,
                &tmp_dir,
                jobs,
                &converter,
            )
            .await?;

            if !keep_tmp_dir {
                std::fs::remove_dir_all(&tmp_dir)
                    .with_context(|| format!("Failed to remove {}", tmp_dir.display()))?;
            }

            println!("\n{}", "Conversion complete.".bold());
            for summary in &summaries {
                println!("  {}", summary.output.display());
            }
        }

        Commands::Heads { data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());

            for split in corefprep::conll::splits::DataSplit::ALL {
                let stats = corefprep::heads::convert_split(&data_dir, split)?;
                println!("Deleted in {split}:");
                println!(
                    "\t{}/{} ({:.2}%) spans",
                    stats.deleted_spans,
                    stats.total_spans,
                    corefprep::heads::percent(stats.deleted_spans, stats.total_spans)
                );
                println!(
                    "\t{}/{} ({:.2}%) clusters\n",
                    stats.deleted_clusters,
                    stats.total_clusters,
                    corefprep::heads::percent(stats.deleted_clusters, stats.total_clusters)
                );
            }
        }

        Commands::Score {
            section,
            data_split,
            epoch,
            log_dir,
        } => {
            config.require_scorer()?;
            let files = corefprep::score::ScoreFiles::locate(
                &log_dir,
                &section,
                data_split.as_str(),
                epoch,
            );
            files.require()?;

            let score = corefprep::score::score(&config, &files).await?;
            for (metric, f1) in &score.metrics {
                println!("{metric} {f1}");
            }
            println!("{} {}", "avg".bold(), score.average());
        }

        Commands::Check { file } => {
            let count = corefprep::input::check_file(&file)?;
            println!("{} {count} documents valid", "✓".green());
        }

        Commands::Status => {
            corefprep::status::show(&config);
        }
    }

    Ok(())
}

/// Ask before deleting an existing temporary directory.
/// Anything but `yes` declines.
fn confirm_delete(tmp_dir: &Path) -> Result<bool> {
    print!(
        "{} already exists! Enter 'yes' to delete it or anything to exit: ",
        tmp_dir.display()
    );
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(answer.trim() == "yes")
}
