//! In-memory wiki for integration testing.
//!
//! Serves canned pages by exact URL and answers 404 for everything
//! else. Every requested URL is recorded in order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use rift_odds::types::SourceError;
use rift_odds::wiki::{PageResponse, WikiSource};

pub const BASE: &str = "https://wiki.test/lol";

#[derive(Default)]
pub struct FakeWiki {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `BASE/<path>`.
    pub fn page(mut self, path: &str, body: impl Into<String>) -> Self {
        self.pages.insert(format!("{BASE}/{path}"), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        let url = format!("{BASE}/{path}");
        self.requests().iter().any(|r| *r == url)
    }
}

#[async_trait]
impl WikiSource for FakeWiki {
    async fn fetch(&self, url: &str) -> Result<PageResponse, SourceError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(match self.pages.get(url) {
            Some(body) => PageResponse {
                url: url.to_string(),
                status: 200,
                body: body.clone(),
            },
            None => PageResponse {
                url: url.to_string(),
                status: 404,
                body: String::new(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

pub fn roster_page(teams: &[&str]) -> String {
    let blocks: String = teams
        .iter()
        .map(|t| {
            format!(r#"<div class="block-team"><span data-highlightingclass="{t}"><a>{t}</a></span></div>"#)
        })
        .collect();
    format!(r#"<html><body><div class="prizepool-section-tables">{blocks}</div></body></html>"#)
}

/// Results table listing `event` followed by the domestic split.
pub fn results_page(event: &str, domestic: &str) -> String {
    format!(
        r#"<div class="table-responsive"><table>
            <tr><td style="width:30px" data-sort-value="{event}">E</td><td>1st</td></tr>
            <tr><td style="width:30px" data-sort-value="{domestic}">D</td><td>1st</td></tr>
        </table></div>"#
    )
}

/// Final standings with one `(team, "W-L")` row per entry.
pub fn standings_page(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(team, record)| {
            format!(r#"<tr><td class="bg-stay">{team}</td><td class="bg-stay"><b>{record}</b></td></tr>"#)
        })
        .collect();
    format!(r#"<table class="wikitable wikitable-bordered grouptable">{body}</table>"#)
}
