//! Web search evidence for the prompt.
//!
//! Search is best effort: every failure degrades to a placeholder string so that generation
//! still runs without evidence. Failure detail only goes to the log.

use crate::config::SearchConfig;
use chrono::Datelike;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const PLACEHOLDER_NO_KEY: &str = "(검색 결과 없음 - API 키 미설정)";
pub const PLACEHOLDER_FAILED: &str = "(검색 실패)";
pub const PLACEHOLDER_NO_RESULTS: &str = "(검색 결과 없음)";
pub const PLACEHOLDER_ERROR: &str = "(검색 중 오류 발생)";

const MAX_RESULTS: usize = 10;

/// Rendered search results, or the placeholder that stands in for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    Found { text: String, count: usize },
    Unavailable(&'static str),
}

impl Evidence {
    pub fn as_text(&self) -> &str {
        match self {
            Evidence::Found { text, .. } => text.as_str(),
            Evidence::Unavailable(placeholder) => *placeholder,
        }
    }

    pub fn result_count(&self) -> usize {
        match self {
            Evidence::Found { count, .. } => *count,
            Evidence::Unavailable(_) => 0,
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_text()) }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extra_snippets: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    cfg: SearchConfig,
}

impl SearchClient {
    pub fn new(http: Client, cfg: SearchConfig) -> Self { Self { http, cfg } }

    /// `"{topic} {year} {marker}"`; nudges the provider towards recent pages.
    pub fn build_query(topic: &str, year: i32, marker: &str) -> String {
        let marker = marker.trim();
        if marker.is_empty() { format!("{} {}", topic, year) } else { format!("{} {} {}", topic, year, marker) }
    }

    pub async fn fetch(&self, topic: &str) -> Evidence {
        self.fetch_for_year(topic, chrono::Local::now().year()).await
    }

    pub async fn fetch_for_year(&self, topic: &str, year: i32) -> Evidence {
        let Some(key) = self.cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            tracing::warn!("search api key not configured; continuing without evidence");
            return Evidence::Unavailable(PLACEHOLDER_NO_KEY);
        };
        let query = Self::build_query(topic, year, &self.cfg.recency_marker);
        tracing::debug!(%query, "search query");

        let count = self.cfg.count.clamp(1, MAX_RESULTS).to_string();
        let mut req = self.http
            .get(&self.cfg.base_url)
            .query(&[
                ("q", query.as_str()),
                ("count", count.as_str()),
                ("search_lang", self.cfg.search_lang.as_str()),
                ("country", self.cfg.country.as_str()),
                ("extra_snippets", if self.cfg.extra_snippets { "true" } else { "false" }),
            ])
            .header("X-Subscription-Token", key)
            .header(ACCEPT, "application/json");
        if let Some(secs) = self.cfg.timeout_secs {
            req = req.timeout(Duration::from_secs(secs));
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error=%e, "search request failed");
                return Evidence::Unavailable(PLACEHOLDER_ERROR);
            }
        };
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            let snip: String = txt.chars().take(200).collect();
            tracing::warn!(%status, body=%snip, "search provider returned an error");
            return Evidence::Unavailable(PLACEHOLDER_FAILED);
        }
        let body: SearchResponse = match resp.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error=%e, "search response did not decode");
                return Evidence::Unavailable(PLACEHOLDER_ERROR);
            }
        };

        let hits = body.web.map(|w| w.results).unwrap_or_default();
        tracing::info!(results = hits.len(), "search completed");
        if hits.is_empty() {
            return Evidence::Unavailable(PLACEHOLDER_NO_RESULTS);
        }
        let count = hits.len().min(MAX_RESULTS);
        Evidence::Found { text: render_hits(&hits), count }
    }
}

/// `[i] title\ndescription[\n추가 정보: snippets]\nURL: url`, blank line between entries.
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .take(MAX_RESULTS)
        .enumerate()
        .map(|(i, h)| {
            let mut entry = format!(
                "[{}] {}\n{}",
                i + 1,
                h.title.as_deref().unwrap_or(""),
                h.description.as_deref().unwrap_or("")
            );
            if let Some(snippets) = h.extra_snippets.as_ref().filter(|s| !s.is_empty()) {
                entry.push_str("\n추가 정보: ");
                entry.push_str(&snippets.join(" "));
            }
            entry.push_str("\nURL: ");
            entry.push_str(h.url.as_deref().unwrap_or(""));
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
