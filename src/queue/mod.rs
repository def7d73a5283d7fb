//! Deduplicating work queue for crawl distribution
//!
//! This module owns the concurrency core of the crawler: a FIFO queue keyed by
//! a unique fingerprint that guarantees each key is queued or in flight at most
//! once until explicitly released. Two instances of it carry the whole crawl:
//! one for URLs awaiting a fetch, one for scraped records awaiting persistence.

mod dedup;

pub use dedup::{DedupQueue, QueueError};
