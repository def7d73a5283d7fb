//! Crawler module for page fetching and crawl coordination
//!
//! This module contains the crawl machinery around the dedup queues:
//! - The page-fetcher contract and its HTTP implementation
//! - Link classification into detail and listing categories
//! - The fixed-size worker pool
//! - The result drain
//! - The orchestrator that sequences startup and shutdown

mod classify;
mod coordinator;
mod drain;
mod fetcher;
mod worker;

pub use classify::{Classifier, LinkAction};
pub use coordinator::{run_crawl, CrawlPhase, CrawlReport, Orchestrator};
pub use drain::run_drain;
pub use fetcher::{extract_page_links, FetchError, HttpFetcher, PageFetcher, PageLink};
pub use worker::{run_worker, WorkerContext};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the results sink
/// 2. Seed the URL queue
/// 3. Start the worker pool and the result drain
/// 4. Wait for the operator interrupt
/// 5. Sequence the shutdown and flush remaining results
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl stopped cleanly
/// * `Err(KumoError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<CrawlReport> {
    run_crawl(config).await
}
