//! Result drain: single consumer between the result queue and the sink
//!
//! The drain outlives cancellation on purpose: after the stop signal it keeps
//! consuming until the result queue's write side is closed and its buffer is
//! empirically empty, so records produced by workers right up to their soft
//! stop are never lost. The orchestrator closes the write side once the last
//! worker has joined; that close is what lets the drain exit.

use crate::crawler::fetcher::PageLink;
use crate::output::ResultSink;
use crate::queue::DedupQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drains the result queue into the sink until the queue is fully exhausted
///
/// Exits only once the queue reports closed-and-empty; cancellation alone is
/// not enough, because a soft-stopping worker may still be finishing a fetch
/// whose records have yet to arrive. A sink failure for one record is logged
/// and does not halt processing of subsequent records. Returns the number of
/// records appended.
pub async fn run_drain(
    result_queue: Arc<DedupQueue<String, PageLink>>,
    mut sink: Box<dyn ResultSink>,
    cancel: CancellationToken,
    poll_interval: Duration,
) -> usize {
    tracing::info!("result drain started");
    let mut appended = 0usize;

    loop {
        match result_queue.try_dequeue() {
            Some((_key, record)) => match sink.append(&record) {
                Ok(()) => appended += 1,
                Err(e) => {
                    tracing::warn!("sink append failed for {}: {}", record.href, e);
                }
            },
            None => {
                // Empty right now. Stop only once the write side is closed;
                // until then a worker may still be about to produce more.
                if result_queue.is_drained() {
                    break;
                }
                if cancel.is_cancelled() {
                    // Workers are quiescing; wait for the close that follows
                    // their join.
                    tokio::time::sleep(poll_interval).await;
                } else {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = tokio::time::sleep(poll_interval) => {}
                    }
                }
            }
        }
    }

    tracing::info!("result drain stopped after {} records", appended);
    appended
}
