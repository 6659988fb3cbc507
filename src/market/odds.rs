//! Consensus odds resolution.
//!
//! Reduces each runner's traded-price series to its median.

use std::collections::HashMap;

use crate::types::{MarketEvent, MatchOdds, ResolutionFailure, RunnerStatus};

/// Median of a price series. `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Maps exchange runner spellings to registry spellings.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    map: HashMap<String, String>,
}

impl NameMap {
    pub fn new(pairs: &[(String, String)]) -> Self {
        Self {
            map: pairs.iter().cloned().collect(),
        }
    }

    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.map.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Consensus odds and outcome for a parsed event.
pub fn resolve_odds(event: &MarketEvent, names: &NameMap) -> Result<MatchOdds, ResolutionFailure> {
    let [a, b] = &event.runners;

    let price = |runner: &crate::types::Runner| {
        median(&runner.prices).ok_or_else(|| ResolutionFailure::NoPrices {
            runner: runner.name.clone(),
        })
    };
    let a_odds = price(a)?;
    let b_odds = price(b)?;

    let a_won = match (&a.status, &b.status) {
        (RunnerStatus::Winner, _) => true,
        (_, RunnerStatus::Winner) => false,
        _ => return Err(ResolutionFailure::Unsettled),
    };

    Ok(MatchOdds {
        team_a: names.normalize(&a.name).to_string(),
        a_odds,
        team_b: names.normalize(&b.name).to_string(),
        b_odds,
        a_won,
    })
}
