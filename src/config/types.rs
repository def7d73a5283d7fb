use serde::Deserialize;

/// Main configuration structure for Kumo-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
    pub seeds: SeedConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent crawl workers
    pub concurrency: u32,

    /// Backoff interval when a worker or the drain finds its queue empty
    /// (milliseconds)
    #[serde(rename = "poll-interval-ms", default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-page fetch timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent string presented to crawled sites
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the tab-separated results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

/// Seed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// The crawl's start URL; defines the origin boundary and resolves
    /// fragment-only hrefs
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Additional seed URLs, deduplicated like any discovered URL
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Link classification rule table
///
/// Substring patterns decide where a discovered link goes: detail patterns
/// route to the result queue, listing patterns (and any fragment href) route
/// back to the URL queue. Detail rules win when both match.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    /// Path fragments identifying detail (content) pages
    #[serde(rename = "detail-patterns", default = "default_detail_patterns")]
    pub detail_patterns: Vec<String>,

    /// Path fragments identifying navigational listing pages
    #[serde(rename = "listing-patterns", default = "default_listing_patterns")]
    pub listing_patterns: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            detail_patterns: default_detail_patterns(),
            listing_patterns: default_listing_patterns(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/144.0.0.0 Safari/537.36"
        .to_string()
}

fn default_detail_patterns() -> Vec<String> {
    vec!["/sites/".to_string()]
}

fn default_listing_patterns() -> Vec<String> {
    vec!["/favorites/".to_string()]
}
