//! Wiki integration.
//!
//! Defines the `WikiSource` trait and the URL layout of the league wiki.
//! - `liquipedia`: throttled HTTP client
//! - `parse`: roster, results and standings extraction

pub mod liquipedia;
pub mod parse;

use async_trait::async_trait;

use crate::types::{Competition, SourceError};

/// A fetched page. Non-success statuses are returned, not raised,
/// so callers can decide on fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a successful page, or `SourceError::Unavailable`.
    pub fn into_body(self) -> Result<String, SourceError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(SourceError::Unavailable {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// Abstraction over the wiki serving roster, results and standings pages.
///
/// Implementors must serialize and throttle their requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Fetch one page. Only transport failures are errors.
    async fn fetch(&self, url: &str) -> Result<PageResponse, SourceError>;
}

/// Encode a page title as a URL path segment (`Gen.G Esports` -> `Gen.G_Esports`).
pub fn path_segment(title: &str) -> String {
    urlencoding::encode(&title.trim().replace(' ', "_")).into_owned()
}

/// `<base>/World_Championship/2021`
pub fn roster_url(base: &str, competition: Competition, year: i32) -> String {
    format!("{}/{}/{year}", base.trim_end_matches('/'), competition.wiki_path())
}

/// `<base>/<Team>/Results`
pub fn results_url(base: &str, team: &str) -> String {
    format!("{}/{}/Results", base.trim_end_matches('/'), path_segment(team))
}

/// `<base>/<League>/<Year>/<Split>`
pub fn standings_url(base: &str, league: &str, year: i32, split: &str) -> String {
    format!(
        "{}/{}/{year}/{}",
        base.trim_end_matches('/'),
        path_segment(league),
        path_segment(split)
    )
}
