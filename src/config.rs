//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a partial file (or none at all) still
//! yields a working configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub wiki: WikiConfig,
    pub registry: RegistryConfig,
    pub snapshots: SnapshotConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WikiConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Minimum delay between the start of two requests.
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://liquipedia.net/leagueoflegends".to_string(),
            user_agent: "RIFT-ODDS/0.1.0 (esports-dataset-builder)".to_string(),
            request_delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RegistryConfig {
    /// Roster names dropped before any lookup.
    pub denylist: Vec<String>,
    /// League whose teams are removed after resolution.
    pub unsupported_league: String,
    /// `(alias, canonical)` spellings registered after the build.
    pub aliases: Vec<(String, String)>,
    pub abort_on_team_failure: bool,
    /// Drop teams outside LPL/LCK/LEC/LCS instead of zero-filling them.
    pub require_tracked_league: bool,
}

/// Teams listed under another region's naming conventions.
pub const DEFAULT_DENYLIST: &[&str] = &["LOUD", "Isurus", "Chiefs Esports Club"];

pub const DEFAULT_UNSUPPORTED_LEAGUE: &str = "VCS";

pub const DEFAULT_TEAM_ALIASES: &[(&str, &str)] = &[
    ("Jd Gaming", "JD Gaming"),
    ("Edward Gaming", "EDward Gaming"),
    ("GenG Esports", "Gen.G Esports"),
];

/// Exchange runner names that differ from the wiki spelling.
pub const DEFAULT_RUNNER_NAMES: &[(&str, &str)] = &[
    ("Mad Lions", "MAD Lions"),
    ("Jd Gaming", "JD Gaming"),
];

fn pairs(src: &[(&str, &str)]) -> Vec<(String, String)> {
    src.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            unsupported_league: DEFAULT_UNSUPPORTED_LEAGUE.to_string(),
            aliases: pairs(DEFAULT_TEAM_ALIASES),
            abort_on_team_failure: false,
            require_tracked_league: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SnapshotConfig {
    /// `(exchange spelling, registry spelling)` pairs applied to runner names.
    pub runner_names: Vec<(String, String)>,
    /// Log progress every N scanned files.
    pub progress_interval: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            runner_names: pairs(DEFAULT_RUNNER_NAMES),
            progress_interval: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// Where relevant snapshots are copied. Defaults to `<year>rel`.
    pub archive_dir: Option<String>,
    pub archive_relevant: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_dir: None,
            archive_relevant: true,
        }
    }
}

impl OutputConfig {
    pub fn archive_dir_for(&self, year: i32) -> String {
        self.archive_dir
            .clone()
            .unwrap_or_else(|| format!("{year}rel"))
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
