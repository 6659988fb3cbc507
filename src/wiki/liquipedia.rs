//! Liquipedia HTTP client.
//!
//! Plain HTML page fetches with a fixed minimum gap between requests.
//! The wiki blocks clients that hammer it, so every request waits for
//! the previous one's slot before it is sent.
//!
//! Pages: `https://liquipedia.net/leagueoflegends/<Page>`
//! Auth: none. A descriptive User-Agent is required by the site's terms.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::{PageResponse, WikiSource};
use crate::config::WikiConfig;
use crate::types::SourceError;

/// Throttled wiki client. Requests are serialized through `last_request`.
pub struct LiquipediaClient {
    http: Client,
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl LiquipediaClient {
    pub fn new(cfg: &WikiConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for Liquipedia")?;

        Ok(Self {
            http,
            min_delay: Duration::from_millis(cfg.request_delay_ms),
            last_request: Mutex::new(None),
        })
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}

/// How long to wait before the next request may start.
fn wait_needed(last: Option<Instant>, now: Instant, min_delay: Duration) -> Duration {
    match last {
        Some(prev) => (prev + min_delay).saturating_duration_since(now),
        None => Duration::ZERO,
    }
}

#[async_trait]
impl WikiSource for LiquipediaClient {
    async fn fetch(&self, url: &str) -> Result<PageResponse, SourceError> {
        // Held for the whole request so calls never overlap.
        let mut last = self.last_request.lock().await;
        let wait = wait_needed(*last, Instant::now(), self.min_delay);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());

        debug!(url = %url, "Fetching wiki page");

        let transport = |e: reqwest::Error| SourceError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.http.get(url).send().await.map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(transport)?;

        debug!(url = %url, status, bytes = body.len(), "Wiki page fetched");

        Ok(PageResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}
