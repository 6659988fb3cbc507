//! Shared types for the RIFT ODDS pipeline.
//!
//! These types form the data model used across the registry, snapshot
//! reader and dataset builder. They carry no I/O so every other module
//! can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Competition
// ---------------------------------------------------------------------------

/// International event a dataset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Competition {
    Worlds,
    Msi,
}

impl Competition {
    /// Wiki path segment of the event page, e.g. `World_Championship`.
    pub fn wiki_path(&self) -> &'static str {
        match self {
            Competition::Worlds => "World_Championship",
            Competition::Msi => "Mid-Season_Invitational",
        }
    }

    /// Tournament name as it appears in a team's results table.
    pub fn results_title(&self, year: i32) -> String {
        match self {
            Competition::Worlds => format!("{year} World Championship"),
            Competition::Msi => format!("Mid-Season Invitational {year}"),
        }
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Competition::Worlds => write!(f, "worlds"),
            Competition::Msi => write!(f, "msi"),
        }
    }
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// Domestic league a team plays in.
///
/// Only the four major regions get a one-hot column in the dataset;
/// everything else is kept by code in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    Lpl,
    Lck,
    Lec,
    Lcs,
    Other(String),
}

impl League {
    /// The tracked leagues in dataset column order.
    pub const TRACKED: [League; 4] = [League::Lpl, League::Lck, League::Lec, League::Lcs];

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "LPL" => League::Lpl,
            "LCK" => League::Lck,
            "LEC" => League::Lec,
            "LCS" => League::Lcs,
            _ => League::Other(code.trim().to_string()),
        }
    }

    /// League code as used in wiki URLs (`LCK`, `CBLOL`, ...).
    pub fn code(&self) -> &str {
        match self {
            League::Lpl => "LPL",
            League::Lck => "LCK",
            League::Lec => "LEC",
            League::Lcs => "LCS",
            League::Other(code) => code,
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, League::Other(_))
    }

    /// One-hot indicators in `TRACKED` order. All zero for untracked leagues.
    pub fn indicators(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        if let Some(pos) = Self::TRACKED.iter().position(|l| l == self) {
            out[pos] = 1;
        }
        out
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Domestic win/loss record for one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl FromStr for Record {
    type Err = String;

    /// Parses standings text of the form `W-L` (whitespace tolerated).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, l) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("no hyphen in record '{s}'"))?;
        let wins = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid wins in record '{s}'"))?;
        let losses = l
            .trim()
            .parse()
            .map_err(|_| format!("invalid losses in record '{s}'"))?;
        Ok(Record { wins, losses })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// A registered team. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub league: League,
    pub record: Record,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.league, self.record)
    }
}

// ---------------------------------------------------------------------------
// Market event
// ---------------------------------------------------------------------------

/// Terminal status of an exchange runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerStatus {
    Active,
    Winner,
    Loser,
    Removed,
    Other(String),
}

impl RunnerStatus {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "ACTIVE" => RunnerStatus::Active,
            "WINNER" => RunnerStatus::Winner,
            "LOSER" => RunnerStatus::Loser,
            "REMOVED" => RunnerStatus::Removed,
            other => RunnerStatus::Other(other.to_string()),
        }
    }
}

/// One participant of a market with every traded price seen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Runner {
    pub id: u64,
    pub name: String,
    /// Last traded prices in stream order.
    pub prices: Vec<f64>,
    pub status: RunnerStatus,
}

/// A parsed market snapshot: title plus exactly two runners.
/// Runner A is the first runner of the first market definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketEvent {
    pub event_name: String,
    pub runners: [Runner; 2],
}

/// Consensus odds and outcome for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub team_a: String,
    pub a_odds: f64,
    pub team_b: String,
    pub b_odds: f64,
    /// True when runner A was marked the winner.
    pub a_won: bool,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures talking to or parsing the wiki.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Source unavailable ({url}): HTTP {status}")]
    Unavailable { url: String, status: u16 },

    #[error("Request failed ({url}): {message}")]
    Transport { url: String, message: String },

    #[error("Unexpected markup ({url}): {what}")]
    ParseMismatch { url: String, what: String },
}

/// Why a single snapshot file produced no odds. Never fatal to a build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("Snapshot unreadable: {0}")]
    Io(String),

    #[error("No market definition in snapshot")]
    MissingDefinition,

    #[error("Malformed market definition: {0}")]
    MalformedDefinition(String),

    #[error("Expected 2 runners, found {0}")]
    RunnerCount(usize),

    #[error("Runner '{runner}' has no traded prices")]
    NoPrices { runner: String },

    #[error("Market has no winner")]
    Unsettled,
}

/// A team that could not be added to the registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Team '{team}' could not be resolved: {error}")]
pub struct TeamFailure {
    pub team: String,
    pub error: SourceError,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
