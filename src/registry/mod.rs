//! Team registry.
//!
//! Resolves every team attending an international event to its domestic
//! league and split record, and indexes each team under all of its known
//! spellings. Each `Team` is stored once; aliases only add index entries.

pub mod season;

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::types::{Competition, League, SourceError, Team, TeamFailure};
use crate::wiki::{self, parse, WikiSource};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable lookup from team spelling to `Team`.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: Vec<Team>,
    aliases: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TeamRegistry {
    /// Index teams by canonical name. Duplicate names keep the first entry.
    pub fn new(teams: Vec<Team>) -> Self {
        let mut registry = Self::default();
        for team in teams {
            if registry.index.contains_key(&team.name) {
                debug!(team = %team.name, "Duplicate team ignored");
                continue;
            }
            registry.index.insert(team.name.clone(), registry.teams.len());
            registry.teams.push(team);
        }
        registry
    }

    /// Register `(alias, canonical)` spellings. Aliases whose canonical
    /// team is not registered are skipped.
    pub fn with_aliases(mut self, aliases: &[(String, String)]) -> Self {
        for (alias, canonical) in aliases {
            let Some(&idx) = self.index.get(canonical) else {
                debug!(alias = %alias, canonical = %canonical, "Alias target not registered");
                continue;
            };
            if self.index.contains_key(alias) {
                continue;
            }
            self.index.insert(alias.clone(), idx);
            self.aliases.push((alias.clone(), canonical.clone()));
        }
        self
    }

    /// Look a team up by canonical name or alias.
    pub fn resolve(&self, name: &str) -> Option<&Team> {
        self.index.get(name).map(|&i| &self.teams[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Alias pairs that were accepted.
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    /// Every known spelling with the team it resolves to.
    pub fn spellings(&self) -> impl Iterator<Item = (&str, &Team)> {
        self.index
            .iter()
            .map(|(name, &i)| (name.as_str(), &self.teams[i]))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Registry build failures that stop the whole build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Roster unavailable: {0}")]
    Roster(SourceError),

    #[error(transparent)]
    Team(TeamFailure),
}

/// A built registry plus the teams that could not be resolved.
#[derive(Debug, Clone)]
pub struct RegistryBuild {
    pub registry: TeamRegistry,
    pub failures: Vec<TeamFailure>,
}

/// Builds a `TeamRegistry` from wiki pages, one request at a time.
pub struct RegistryBuilder<'a, S: WikiSource + ?Sized> {
    source: &'a S,
    base_url: String,
    config: RegistryConfig,
}

impl<'a, S: WikiSource + ?Sized> RegistryBuilder<'a, S> {
    pub fn new(source: &'a S, base_url: impl Into<String>, config: RegistryConfig) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            config,
        }
    }

    /// Resolve every team attending `competition` in `year`.
    pub async fn build(
        &self,
        competition: Competition,
        year: i32,
    ) -> Result<RegistryBuild, RegistryError> {
        let roster = self
            .fetch_roster(competition, year)
            .await
            .map_err(RegistryError::Roster)?;
        info!(%competition, year, teams = roster.len(), "Roster fetched");

        let mut teams = Vec::new();
        let mut failures = Vec::new();

        for name in roster {
            match self.resolve_team(competition, year, &name).await {
                Ok(team) => {
                    info!(team = %team.name, league = %team.league, record = %team.record, "Team resolved");
                    teams.push(team);
                }
                Err(error) => {
                    let failure = TeamFailure { team: name, error };
                    warn!(team = %failure.team, error = %failure.error, "Team resolution failed");
                    if self.config.abort_on_team_failure {
                        return Err(RegistryError::Team(failure));
                    }
                    failures.push(failure);
                }
            }
        }

        let teams = self.retain_supported(teams);
        let registry = TeamRegistry::new(teams).with_aliases(&self.config.aliases);
        info!(
            teams = registry.len(),
            aliases = registry.aliases().len(),
            failed = failures.len(),
            "Registry built"
        );

        Ok(RegistryBuild { registry, failures })
    }

    /// Team names listed for the event, minus the denylist.
    pub async fn fetch_roster(
        &self,
        competition: Competition,
        year: i32,
    ) -> Result<Vec<String>, SourceError> {
        let url = wiki::roster_url(&self.base_url, competition, year);
        let html = self.source.fetch(&url).await?.into_body()?;
        let teams = parse::parse_roster(&html).ok_or_else(|| SourceError::ParseMismatch {
            url: url.clone(),
            what: "no prize pool section".to_string(),
        })?;

        Ok(teams
            .into_iter()
            .filter(|t| {
                let denied = self.config.denylist.iter().any(|d| d == t);
                if denied {
                    debug!(team = %t, "Team denylisted");
                }
                !denied
            })
            .collect())
    }

    /// League and split record of one team.
    pub async fn resolve_team(
        &self,
        competition: Competition,
        year: i32,
        team: &str,
    ) -> Result<Team, SourceError> {
        let league = self.fetch_league(competition, year, team).await?;
        let (season_year, split) = season::split_for(competition, league.code(), year);
        let url = wiki::standings_url(&self.base_url, league.code(), season_year, split);
        let (url, html) = self.fetch_standings(&url).await?;

        let record =
            parse::parse_standings(&html, team).ok_or_else(|| SourceError::ParseMismatch {
                url,
                what: format!("no final standings row for {team}"),
            })?;

        Ok(Team {
            name: team.to_string(),
            league,
            record,
        })
    }

    async fn fetch_league(
        &self,
        competition: Competition,
        year: i32,
        team: &str,
    ) -> Result<League, SourceError> {
        let url = wiki::results_url(&self.base_url, team);
        let html = self.source.fetch(&url).await?.into_body()?;
        let title = competition.results_title(year);
        let code = parse::parse_league(&html, &title).ok_or_else(|| SourceError::ParseMismatch {
            url,
            what: format!("no tournament listed after '{title}'"),
        })?;
        Ok(League::from_code(&code))
    }

    /// Fetch a standings page, retrying once with the Winter split when
    /// the primary split page is missing. Returns the URL actually used.
    async fn fetch_standings(&self, url: &str) -> Result<(String, String), SourceError> {
        let page = self.source.fetch(url).await?;
        if page.is_success() {
            return Ok((page.url, page.body));
        }

        let fallback = season::winter_fallback(url);
        debug!(primary = %url, status = page.status, fallback = %fallback, "Split page missing, trying Winter");
        let body = self.source.fetch(&fallback).await?.into_body()?;
        Ok((fallback, body))
    }

    fn retain_supported(&self, teams: Vec<Team>) -> Vec<Team> {
        let unsupported = League::from_code(&self.config.unsupported_league);
        teams
            .into_iter()
            .filter(|team| {
                if team.league == unsupported {
                    debug!(team = %team.name, league = %team.league, "Unsupported league, dropped");
                    return false;
                }
                if self.config.require_tracked_league && !team.league.is_tracked() {
                    debug!(team = %team.name, league = %team.league, "Untracked league, dropped");
                    return false;
                }
                true
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
