//! Domestic split selection for an international event.

use crate::types::Competition;

/// Split page used when a league has no page for the selected split.
pub const FALLBACK_SPLIT: &str = "Winter";

/// The domestic split whose standings describe a team going into
/// `competition` of `year`, as `(season year, split name)`.
///
/// MSI is played mid-year, so the latest finished split with comparable
/// weight is the previous year's Summer. Worlds follows the same year's
/// Spring. Leagues with non-standard split names are mapped explicitly.
pub fn split_for(competition: Competition, league: &str, year: i32) -> (i32, &'static str) {
    match competition {
        Competition::Msi => {
            let split = match league {
                "LLA" => "Closing",
                "CBLOL" => "Split 2",
                _ => "Summer",
            };
            (year - 1, split)
        }
        Competition::Worlds => {
            let split = match league {
                "LLA" => "Opening",
                "CBLOL" => "Split 1",
                _ => "Spring",
            };
            (year, split)
        }
    }
}

/// Replace the trailing path segment of a standings URL with `Winter`.
pub fn winter_fallback(url: &str) -> String {
    match url.trim_end_matches('/').rsplit_once('/') {
        Some((head, _)) => format!("{head}/{FALLBACK_SPLIT}"),
        None => FALLBACK_SPLIT.to_string(),
    }
}
