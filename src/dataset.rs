//! Match dataset.
//!
//! One `MatchRow` per relevant snapshot, assembled as a pure fold over
//! parsed market events so the same registry and events always give the
//! same rows in the same order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::filter;
use crate::market::odds::{resolve_odds, NameMap};
use crate::registry::TeamRegistry;
use crate::types::{MarketEvent, MatchOdds};

/// One labelled match. Team names are canonical registry names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub team_a: String,
    pub team_b: String,
    pub a_odds: f64,
    pub b_odds: f64,
    pub a_wins: u32,
    pub a_losses: u32,
    pub b_wins: u32,
    pub b_losses: u32,
    /// LPL, LCK, LEC, LCS indicators for team A.
    pub a_league: [u8; 4],
    pub b_league: [u8; 4],
    /// 1 if team A won.
    pub result: u8,
}

impl MatchRow {
    pub const COLUMNS: [&'static str; 17] = [
        "Team A", "Team B", "A Odds", "B Odds", "A Wins", "A Losses", "B Wins", "B Losses",
        "A LPL", "A LCK", "A LEC", "A LCS", "B LPL", "B LCK", "B LEC", "B LCS", "Result",
    ];

    /// Row for `odds` when both teams are registered.
    pub fn assemble(odds: &MatchOdds, registry: &TeamRegistry) -> Option<Self> {
        let a = registry.resolve(&odds.team_a)?;
        let b = registry.resolve(&odds.team_b)?;
        Some(Self {
            team_a: a.name.clone(),
            team_b: b.name.clone(),
            a_odds: odds.a_odds,
            b_odds: odds.b_odds,
            a_wins: a.record.wins,
            a_losses: a.record.losses,
            b_wins: b.record.wins,
            b_losses: b.record.losses,
            a_league: a.league.indicators(),
            b_league: b.league.indicators(),
            result: u8::from(odds.a_won),
        })
    }

    /// The 14 numeric features: every column except team names and Result.
    pub fn features(&self) -> Vec<f64> {
        let mut out = vec![
            self.a_odds,
            self.b_odds,
            f64::from(self.a_wins),
            f64::from(self.a_losses),
            f64::from(self.b_wins),
            f64::from(self.b_losses),
        ];
        out.extend(self.a_league.iter().map(|&v| f64::from(v)));
        out.extend(self.b_league.iter().map(|&v| f64::from(v)));
        out
    }
}

/// Ordered, append-only sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<MatchRow>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<MatchRow>) -> Self {
        Self { rows }
    }

    /// Fold parsed events into rows: relevance check, odds resolution,
    /// team lookup. Events failing any step are skipped.
    pub fn assemble<'e>(
        registry: &TeamRegistry,
        events: impl IntoIterator<Item = &'e MarketEvent>,
        names: &NameMap,
    ) -> Self {
        let rows = events
            .into_iter()
            .filter(|ev| filter::is_relevant(&ev.event_name, registry))
            .filter_map(|ev| match resolve_odds(ev, names) {
                Ok(odds) => Some(odds),
                Err(reason) => {
                    debug!(event = %ev.event_name, %reason, "Snapshot skipped");
                    None
                }
            })
            .filter_map(|odds| {
                let row = MatchRow::assemble(&odds, registry);
                if row.is_none() {
                    debug!(team_a = %odds.team_a, team_b = %odds.team_b, "Runner not registered");
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(MatchRow::features).collect()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.rows.iter().map(|r| r.result).collect()
    }
}
