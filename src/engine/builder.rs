//! Dataset builder.
//!
//! Builds the team registry once, then walks the snapshot corpus file by
//! file: cheap title check, archive copy of relevant files, full parse,
//! and finally the row fold in `Dataset::assemble`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::engine::filter;
use crate::market::{self, odds::NameMap};
use crate::registry::{RegistryBuilder, TeamRegistry};
use crate::types::{Competition, MarketEvent, TeamFailure};
use crate::wiki::WikiSource;

/// Counters for one corpus scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_scanned: usize,
    pub relevant: usize,
    pub archived: usize,
    /// Relevant files that produced no row.
    pub skipped: usize,
    pub rows: usize,
}

/// Everything a build produced.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub registry: TeamRegistry,
    pub dataset: Dataset,
    pub summary: BuildSummary,
    pub failures: Vec<TeamFailure>,
}

pub struct DatasetBuilder {
    config: AppConfig,
    names: NameMap,
}

impl DatasetBuilder {
    pub fn new(config: AppConfig) -> Self {
        let names = NameMap::new(&config.snapshots.runner_names);
        Self { config, names }
    }

    /// Full build: registry from the wiki, then the corpus scan.
    pub async fn build<S: WikiSource + ?Sized>(
        &self,
        source: &S,
        competition: Competition,
        year: i32,
        corpus_root: &Path,
    ) -> Result<BuildOutcome> {
        let registry_build = RegistryBuilder::new(
            source,
            self.config.wiki.base_url.clone(),
            self.config.registry.clone(),
        )
        .build(competition, year)
        .await
        .context("Failed to build team registry")?;

        let archive = self.archive_dir(year);
        let (dataset, summary) =
            self.scan_corpus(&registry_build.registry, corpus_root, archive.as_deref())?;

        Ok(BuildOutcome {
            registry: registry_build.registry,
            dataset,
            summary,
            failures: registry_build.failures,
        })
    }

    /// Archive directory for `year`, or `None` when archiving is off.
    pub fn archive_dir(&self, year: i32) -> Option<PathBuf> {
        self.config
            .output
            .archive_relevant
            .then(|| PathBuf::from(self.config.output.archive_dir_for(year)))
    }

    /// Scan every file under `corpus_root` against an existing registry.
    pub fn scan_corpus(
        &self,
        registry: &TeamRegistry,
        corpus_root: &Path,
        archive: Option<&Path>,
    ) -> Result<(Dataset, BuildSummary)> {
        let files = collect_files(corpus_root)
            .with_context(|| format!("Failed to list corpus {}", corpus_root.display()))?;
        info!(root = %corpus_root.display(), files = files.len(), teams = registry.len(), "Scanning corpus");

        if let Some(dir) = archive {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create archive dir {}", dir.display()))?;
        }

        let progress_every = self.config.snapshots.progress_interval.max(1);
        let mut summary = BuildSummary::default();
        let mut events: Vec<MarketEvent> = Vec::new();

        for path in &files {
            summary.files_scanned += 1;
            if summary.files_scanned % progress_every == 0 {
                info!(scanned = summary.files_scanned, relevant = summary.relevant, "Corpus progress");
            }

            let title = match market::read_event_name(path) {
                Ok(title) => title,
                Err(reason) => {
                    debug!(file = %path.display(), %reason, "Unreadable snapshot");
                    continue;
                }
            };
            if !filter::is_relevant(&title, registry) {
                continue;
            }
            summary.relevant += 1;

            if let Some(dir) = archive {
                match archive_file(path, dir) {
                    Ok(()) => summary.archived += 1,
                    Err(e) => warn!(file = %path.display(), error = %format!("{e:#}"), "Archive copy failed"),
                }
            }

            match market::read_event(path) {
                Ok(event) => events.push(event),
                Err(reason) => debug!(file = %path.display(), %reason, "Snapshot skipped"),
            }
        }

        let dataset = Dataset::assemble(registry, &events, &self.names);
        summary.rows = dataset.len();
        summary.skipped = summary.relevant.saturating_sub(summary.rows);

        info!(
            scanned = summary.files_scanned,
            relevant = summary.relevant,
            archived = summary.archived,
            skipped = summary.skipped,
            rows = summary.rows,
            "Corpus scan complete"
        );
        Ok((dataset, summary))
    }
}

/// Every regular file below `root`, sorted by path for reproducible order.
pub fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

fn archive_file(path: &Path, dir: &Path) -> Result<()> {
    let Some(name) = path.file_name() else {
        return Ok(());
    };
    let dest = dir.join(name);
    fs::copy(path, &dest)
        .with_context(|| format!("Failed to archive {} to {}", path.display(), dest.display()))?;
    Ok(())
}
