//! Page fetcher: the browser-facing collaborator
//!
//! The crawler core only depends on the [`PageFetcher`] trait: give it a URL,
//! get back the same-origin links discovered on that page. The shipped
//! implementation fetches over HTTP with reqwest and extracts anchors with
//! scraper; a headless-browser implementation would satisfy the same contract.
//!
//! Origin filtering happens here, before classification ever sees a link:
//! only same-origin hrefs (relative to the crawl's start URL) are returned,
//! and empty, bare-`#`, and `javascript:` hrefs are dropped.

use crate::url::{is_crawlable_href, same_origin};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;

/// A link discovered on a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Link title, from a nested `<strong>` or the anchor text
    pub title: String,

    /// The href exactly as it appeared in the document
    pub href: String,

    /// Short description from a nested `<p>`, when present
    pub description: Option<String>,
}

/// Errors a fetch can fail with
///
/// All of these are recovered at the worker: a failed fetch is logged and
/// treated as a page with zero links.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),
}

/// Contract for page fetching
///
/// `fetch` navigates to the URL, waits for the page to settle, and returns
/// the links discovered on it, already origin-filtered.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<PageLink>, FetchError>;
}

/// HTTP implementation of [`PageFetcher`]
///
/// Each worker owns its own instance (and thus its own connection pool),
/// created once at worker startup and reused across all its dequeued URLs.
pub struct HttpFetcher {
    client: Client,
    start_url: String,
}

impl HttpFetcher {
    /// Builds a fetcher with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `start_url` - The crawl's start URL; defines the origin boundary
    /// * `user_agent` - User agent string presented to the site
    /// * `timeout` - Per-request timeout
    pub fn new(
        start_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            start_url: start_url.to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<PageLink>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(extract_page_links(&body, &self.start_url))
    }
}

/// Extracts same-origin links with their titles and descriptions
///
/// For each `a[href]` in the document:
/// - the href is trimmed; empty, `#`-only, and `javascript:` hrefs are skipped
/// - cross-origin hrefs (relative to `start_url`) are skipped
/// - the title comes from a nested `<strong>` if one exists, otherwise from
///   the anchor's own text; anchors with no title are skipped
/// - the description comes from a nested `<p>`, when present and non-empty
pub fn extract_page_links(html: &str, start_url: &str) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let anchor_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return links,
    };
    let strong_selector = Selector::parse("strong").ok();
    let p_selector = Selector::parse("p").ok();

    for anchor in document.select(&anchor_selector) {
        let href = match anchor.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };

        if !is_crawlable_href(href) || !same_origin(start_url, href) {
            continue;
        }

        let title = strong_selector
            .as_ref()
            .and_then(|sel| anchor.select(sel).next())
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| element_text(anchor));

        if title.is_empty() {
            continue;
        }

        let description = p_selector
            .as_ref()
            .and_then(|sel| anchor.select(sel).next())
            .map(element_text)
            .filter(|d| !d.is_empty());

        links.push(PageLink {
            title,
            href: href.to_string(),
            description,
        });
    }

    links
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
