//! RIFT ODDS: esports match dataset builder
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then either builds a dataset for one event (registry from the wiki
//! or a cached registry file, plus a snapshot corpus scan) or fits and
//! scores the baseline classifiers on a saved dataset.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use rift_odds::config::AppConfig;
use rift_odds::engine::builder::{BuildSummary, DatasetBuilder};
use rift_odds::model::{self, Classifier, ImpliedOddsClassifier, MajorityClassifier};
use rift_odds::registry::RegistryBuilder;
use rift_odds::storage;
use rift_odds::types::Competition;
use rift_odds::wiki::liquipedia::LiquipediaClient;

#[derive(Parser)]
#[command(name = "rift-odds")]
#[command(about = "Build labelled esports match datasets from wiki standings and exchange odds")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml", env = "RIFT_ODDS_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the match dataset for one event
    Build {
        #[arg(long, value_enum)]
        competition: Competition,
        #[arg(long)]
        year: i32,
        /// Root of the snapshot corpus
        #[arg(long)]
        corpus: PathBuf,
        /// Write the dataset as JSON
        #[arg(long)]
        output: Option<PathBuf>,
        /// Copy relevant snapshots here (default `<year>rel`)
        #[arg(long)]
        archive_dir: Option<String>,
        /// Do not copy relevant snapshots
        #[arg(long)]
        no_archive: bool,
        /// Registry JSON: loaded if present, written after a wiki build otherwise
        #[arg(long)]
        registry_cache: Option<PathBuf>,
    },
    /// Fit and score the baseline classifiers on a saved dataset
    Evaluate {
        #[arg(long)]
        dataset: PathBuf,
        #[arg(long, default_value_t = model::DEFAULT_TEST_FRACTION)]
        test_fraction: f64,
        #[arg(long, default_value_t = model::DEFAULT_SEED)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let mut cfg = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Build {
            competition,
            year,
            corpus,
            output,
            archive_dir,
            no_archive,
            registry_cache,
        } => {
            if archive_dir.is_some() {
                cfg.output.archive_dir = archive_dir;
            }
            if no_archive {
                cfg.output.archive_relevant = false;
            }
            run_build(cfg, competition, year, corpus, output, registry_cache).await
        }
        Commands::Evaluate {
            dataset,
            test_fraction,
            seed,
        } => run_evaluate(dataset, test_fraction, seed),
    }
}

async fn run_build(
    cfg: AppConfig,
    competition: Competition,
    year: i32,
    corpus: PathBuf,
    output: Option<PathBuf>,
    registry_cache: Option<PathBuf>,
) -> Result<()> {
    info!(%competition, year, corpus = %corpus.display(), "Building dataset");

    let client = LiquipediaClient::new(&cfg.wiki)?;
    let builder = DatasetBuilder::new(cfg.clone());

    let cached = match registry_cache.as_deref() {
        Some(path) => storage::load_registry(path)?,
        None => None,
    };

    let (dataset, summary) = match cached {
        Some(registry) => {
            let archive = builder.archive_dir(year);
            builder.scan_corpus(&registry, &corpus, archive.as_deref())?
        }
        None if registry_cache.is_some() => {
            // Build the registry separately so it can be cached before the scan.
            let build = RegistryBuilder::new(&client, cfg.wiki.base_url.clone(), cfg.registry.clone())
                .build(competition, year)
                .await?;
            for failure in &build.failures {
                warn!(team = %failure.team, error = %failure.error, "Team excluded");
            }
            if let Some(path) = registry_cache.as_deref() {
                storage::save_registry(&build.registry, path)?;
            }
            let archive = builder.archive_dir(year);
            builder.scan_corpus(&build.registry, &corpus, archive.as_deref())?
        }
        None => {
            let outcome = builder.build(&client, competition, year, &corpus).await?;
            for failure in &outcome.failures {
                warn!(team = %failure.team, error = %failure.error, "Team excluded");
            }
            (outcome.dataset, outcome.summary)
        }
    };

    log_summary(&summary);

    if let Some(path) = output {
        storage::save_dataset(&dataset, &path)?;
    }
    Ok(())
}

fn run_evaluate(path: PathBuf, test_fraction: f64, seed: u64) -> Result<()> {
    let dataset = storage::load_dataset(&path)?;
    let split = model::train_test_split(&dataset, test_fraction, seed);
    info!(
        rows = dataset.len(),
        train = split.train.len(),
        test = split.test.len(),
        seed,
        "Dataset split"
    );

    let mut classifiers: Vec<Box<dyn Classifier>> = vec![
        Box::new(ImpliedOddsClassifier),
        Box::new(MajorityClassifier::default()),
    ];
    for classifier in classifiers.iter_mut() {
        let report = model::fit_and_evaluate(classifier.as_mut(), &split);
        info!(
            classifier = %report.classifier,
            test = report.samples,
            accuracy = format!("{:.3}", report.accuracy),
            brier = format!("{:.4}", report.brier),
            a_win_rate = format!("{:.3}", report.a_win_rate),
            "Evaluation complete"
        );
    }
    Ok(())
}

/// Log a human-readable build summary.
fn log_summary(summary: &BuildSummary) {
    info!(
        scanned = summary.files_scanned,
        relevant = summary.relevant,
        archived = summary.archived,
        skipped = summary.skipped,
        rows = summary.rows,
        "Dataset build complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rift_odds=info"));

    let json_logging = std::env::var("RIFT_ODDS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
