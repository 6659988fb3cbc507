//! Persistence layer.
//!
//! Saves and loads the team registry and built datasets as JSON files.
//! A cached registry lets repeated corpus scans skip the wiki entirely.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::registry::TeamRegistry;
use crate::types::Team;

/// On-disk form of a registry: teams plus accepted alias pairs.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    teams: Vec<Team>,
    aliases: Vec<(String, String)>,
}

/// Save a registry to a JSON file.
pub fn save_registry(registry: &TeamRegistry, path: &Path) -> Result<()> {
    let file = RegistryFile {
        teams: registry.teams().to_vec(),
        aliases: registry.aliases().to_vec(),
    };
    let json = serde_json::to_string_pretty(&file).context("Failed to serialise registry")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write registry to {}", path.display()))?;

    debug!(path = %path.display(), teams = registry.len(), "Registry saved");
    Ok(())
}

/// Load a registry from a JSON file.
/// Returns None if the file doesn't exist.
pub fn load_registry(path: &Path) -> Result<Option<TeamRegistry>> {
    if !path.exists() {
        info!(path = %path.display(), "No cached registry found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry from {}", path.display()))?;
    let file: RegistryFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse registry from {}", path.display()))?;

    let registry = TeamRegistry::new(file.teams).with_aliases(&file.aliases);
    info!(
        path = %path.display(),
        teams = registry.len(),
        aliases = registry.aliases().len(),
        "Registry loaded from disk"
    );
    Ok(Some(registry))
}

/// Save a dataset to a JSON file.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset).context("Failed to serialise dataset")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write dataset to {}", path.display()))?;

    info!(path = %path.display(), rows = dataset.len(), "Dataset saved");
    Ok(())
}

/// Load a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset from {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse dataset from {}", path.display()))?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
