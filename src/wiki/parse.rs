//! HTML extraction for wiki pages.
//!
//! All parsers are pure: they take page HTML and return `None` / empty
//! when the expected markup is absent. Callers turn that into
//! `SourceError::ParseMismatch` with the page URL attached.

use scraper::{ElementRef, Html, Selector};

use crate::types::Record;

fn selector(css: &str) -> Selector {
    // Selectors are compile-time literals; a failure here is a programming error.
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Team names from an event page's prize pool section.
pub fn parse_roster(html: &str) -> Option<Vec<String>> {
    let doc = Html::parse_document(html);
    let section = doc.select(&selector("div.prizepool-section-tables")).next()?;

    let blocks = selector("div.block-team");
    let span = selector("span");

    let teams = section
        .select(&blocks)
        .filter_map(|block| {
            block
                .select(&span)
                .next()
                .and_then(|s| s.value().attr("data-highlightingclass"))
                .map(|name| name.trim().to_string())
        })
        .filter(|name| !name.is_empty())
        .collect();
    Some(teams)
}

/// League code from a team's results page.
///
/// The results table lists tournaments newest first, each in a cell
/// styled `width:30px` with a `data-sort-value`. The tournament right
/// after `event_title` is the domestic split that qualified the team;
/// its first word is the league code.
pub fn parse_league(html: &str, event_title: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let table = doc.select(&selector("div.table-responsive")).next()?;

    let rows = selector("tr");
    let cells = selector("td");

    let mut previous: Option<String> = None;
    for row in table.select(&rows) {
        for cell in row.select(&cells) {
            let styled = cell
                .value()
                .attr("style")
                .is_some_and(|s| s.replace(' ', "").contains("width:30px"));
            if !styled {
                continue;
            }
            let value = cell.value().attr("data-sort-value").unwrap_or_default();
            if previous.as_deref() == Some(event_title) {
                return value.split_whitespace().next().map(str::to_string);
            }
            previous = Some(value.trim().to_string());
        }
    }
    None
}

/// Win/loss record for `team` from a split's standings table.
///
/// Standings cells carry a `bg-*` class. A cell naming the team is
/// followed by its record cell, which is bold once standings are final.
pub fn parse_standings(html: &str, team: &str) -> Option<Record> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&selector("table.wikitable.wikitable-bordered.grouptable"))
        .next()?;

    let cells = selector("td");
    let bold = selector("b");

    let mut after_team = false;
    for cell in table.select(&cells) {
        let styled = cell.value().classes().any(|c| c.starts_with("bg-"));
        if !styled {
            continue;
        }
        let text = text_of(&cell);
        if text.contains(team) {
            after_team = true;
        } else if after_team && cell.select(&bold).next().is_some() {
            if let Ok(record) = text.parse::<Record>() {
                return Some(record);
            }
            after_team = false;
        } else {
            after_team = false;
        }
    }
    None
}
