//! Relevance filter.
//!
//! A snapshot belongs to the event being built when its title names
//! exactly two registered teams. Titles naming one team (outright or
//! handicap markets) or three and more (group winner markets) are skipped.

use std::collections::BTreeSet;

use crate::registry::TeamRegistry;
use crate::types::Team;

/// Registered teams whose canonical name or an alias occurs in `title`,
/// each counted once, ordered by canonical name.
pub fn teams_in_title<'r>(title: &str, registry: &'r TeamRegistry) -> Vec<&'r Team> {
    let matched: BTreeSet<&str> = registry
        .spellings()
        .filter(|(spelling, _)| title.contains(spelling))
        .map(|(_, team)| team.name.as_str())
        .collect();
    matched
        .into_iter()
        .filter_map(|name| registry.resolve(name))
        .collect()
}

/// True iff exactly two distinct registered teams appear in `title`.
/// A name contained in another (`T1` in `T1 Academy`) is a match of its own.
pub fn is_relevant(title: &str, registry: &TeamRegistry) -> bool {
    teams_in_title(title, registry).len() == 2
}
