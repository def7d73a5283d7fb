//! Crawl worker loop
//!
//! Each worker polls the URL queue, runs one scrape unit per dequeued URL,
//! and re-feeds both queues with the links it finds. Workers stop
//! cooperatively: cancellation is observed at loop-iteration boundaries, so
//! a fetch already in progress runs to completion (soft stop).

use crate::crawler::classify::{Classifier, LinkAction};
use crate::crawler::fetcher::{PageFetcher, PageLink};
use crate::queue::DedupQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything a single worker needs to run
pub struct WorkerContext {
    /// Worker index, for logging only
    pub id: usize,

    /// The worker's own fetch context, created once and reused
    pub fetcher: Arc<dyn PageFetcher>,

    /// URLs awaiting a fetch; metadata is empty
    pub url_queue: Arc<DedupQueue<String, ()>>,

    /// Scraped records awaiting persistence, keyed by href
    pub result_queue: Arc<DedupQueue<String, PageLink>>,

    /// Link routing rules
    pub classifier: Arc<Classifier>,

    /// Backoff when the URL queue is momentarily empty
    pub poll_interval: Duration,

    /// Shared stop signal
    pub cancel: CancellationToken,
}

/// Runs one worker until cancellation
///
/// The loop never exits on an empty queue: during a crawl an empty URL queue
/// usually just means the other workers are mid-fetch and about to enqueue
/// more. Only the stop signal ends the loop.
pub async fn run_worker(ctx: WorkerContext) {
    tracing::info!("worker {} started", ctx.id);

    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }

        match ctx.url_queue.try_dequeue() {
            Some((url, ())) => {
                tracing::info!("worker {} fetching: {}", ctx.id, url);
                scrape_unit(&ctx, &url).await;
                // The URL's dedup marker is deliberately left in place: a
                // crawled URL must not be re-enqueued when other pages link
                // back to it. Teardown clears the set.
            }
            None => {
                // Backoff that also wakes on cancellation, to avoid both a
                // busy-spin and a slow shutdown.
                tokio::select! {
                    _ = ctx.cancel.cancelled() => break,
                    _ = tokio::time::sleep(ctx.poll_interval) => {}
                }
            }
        }
    }

    tracing::info!("worker {} stopped", ctx.id);
}

/// Fetches one URL and routes every discovered link
///
/// A fetch failure is contained here: it is logged and treated as a page
/// with zero links. The URL is not re-enqueued.
async fn scrape_unit(ctx: &WorkerContext, url: &str) {
    let links = match ctx.fetcher.fetch(url).await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("worker {} fetch failed for {}: {}", ctx.id, url, e);
            return;
        }
    };

    for link in links {
        match ctx.classifier.classify(&link.href) {
            LinkAction::Record => {
                // Records from a fetch that soft stop let finish must still
                // reach the drain, so this enqueue ignores cancellation; only
                // new crawl work (the Follow arm) honors the stop signal.
                let key = link.href.clone();
                match ctx.result_queue.try_enqueue(key, link) {
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("worker {} result enqueue rejected: {}", ctx.id, e)
                    }
                }
            }
            LinkAction::Follow(resolved) => {
                match ctx
                    .url_queue
                    .enqueue(resolved.to_string(), (), &ctx.cancel)
                    .await
                {
                    Ok(_) => {}
                    Err(e) => tracing::debug!("worker {} url enqueue rejected: {}", ctx.id, e),
                }
            }
            LinkAction::Discard => {}
        }
    }
}
