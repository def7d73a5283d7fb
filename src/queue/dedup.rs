//! Generic deduplicating FIFO queue
//!
//! The queue tracks a dedup set of keys alongside a FIFO buffer of
//! `(key, metadata)` pairs. A key that is already tracked cannot be enqueued
//! again until a consumer releases it with [`DedupQueue::complete`]. Dedup
//! happens at enqueue time, so a link that is rediscovered on every page of a
//! site costs one queue slot for the whole crawl instead of one per sighting.
//!
//! All state lives behind a single mutex per instance; no operation holds the
//! lock across a suspension point. Metadata travels inside the buffer with its
//! key, so a dequeued item always carries the metadata it was enqueued with,
//! even if `complete` raced ahead of the dequeue.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors surfaced by enqueue operations
///
/// A duplicate key is not an error; it is reported as `Ok(false)` because it
/// is an expected control-flow outcome for callers feeding rediscovered work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The write side of the queue has been closed
    #[error("queue is closed for writing")]
    Closed,

    /// The enqueue was abandoned because cancellation was signaled
    #[error("enqueue cancelled")]
    Cancelled,
}

/// Observer invoked synchronously on each successful enqueue
///
/// Runs inside the enqueue critical path, before the item becomes consumable.
/// Keep it side-effect-light (logging, counters).
type EnqueueObserver<K, M> = Box<dyn Fn(&K, &M) + Send + Sync>;

struct Inner<K, M> {
    /// FIFO delivery buffer; insertion order is delivery order
    buffer: VecDeque<(K, M)>,

    /// Keys currently tracked: queued, in processing, or being enqueued
    tracked: HashSet<K>,

    /// Set once by `close`; queued items remain consumable afterwards
    closed: bool,
}

/// Thread-safe work queue with at-most-one-in-flight-per-key semantics
///
/// Safe for concurrent multi-producer/multi-consumer access. `K` is an opaque
/// fingerprint identifying a unit of work (for the crawler, a resolved URL);
/// `M` is an arbitrary payload carried alongside it.
pub struct DedupQueue<K, M> {
    inner: Mutex<Inner<K, M>>,
    on_enqueue: Option<EnqueueObserver<K, M>>,
}

impl<K, M> DedupQueue<K, M>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty queue with no enqueue observer
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                buffer: VecDeque::new(),
                tracked: HashSet::new(),
                closed: false,
            }),
            on_enqueue: None,
        }
    }

    /// Creates an empty queue that invokes `observer` once per successful
    /// enqueue, before the item becomes visible to consumers
    pub fn with_observer(observer: impl Fn(&K, &M) + Send + Sync + 'static) -> Self {
        let mut queue = Self::new();
        queue.on_enqueue = Some(Box::new(observer));
        queue
    }

    /// Atomically checks membership and inserts
    ///
    /// Returns `Ok(false)` without side effects if `key` is already tracked.
    /// Returns `Err(QueueError::Closed)` if the write side is closed; in that
    /// case the dedup marker taken during the attempt is rolled back, so a
    /// later enqueue of the same key into a healthy queue can succeed.
    /// Otherwise inserts the item and returns `Ok(true)`.
    pub fn try_enqueue(&self, key: K, meta: M) -> Result<bool, QueueError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.tracked.insert(key.clone()) {
            return Ok(false);
        }

        if inner.closed {
            // Roll back the marker so the key is not permanently unsubmittable.
            inner.tracked.remove(&key);
            return Err(QueueError::Closed);
        }

        if let Some(observer) = &self.on_enqueue {
            observer(&key, &meta);
        }
        inner.buffer.push_back((key, meta));
        Ok(true)
    }

    /// Suspending enqueue variant
    ///
    /// Same semantics as [`try_enqueue`](Self::try_enqueue), but observes
    /// `cancel` between taking the dedup marker and committing the write. On
    /// cancellation or a closed writer the marker is rolled back and the
    /// failure propagates to the caller.
    pub async fn enqueue(
        &self,
        key: K,
        meta: M,
        cancel: &CancellationToken,
    ) -> Result<bool, QueueError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.tracked.insert(key.clone()) {
            return Ok(false);
        }

        if cancel.is_cancelled() {
            inner.tracked.remove(&key);
            return Err(QueueError::Cancelled);
        }

        if inner.closed {
            inner.tracked.remove(&key);
            return Err(QueueError::Closed);
        }

        if let Some(observer) = &self.on_enqueue {
            observer(&key, &meta);
        }
        inner.buffer.push_back((key, meta));
        Ok(true)
    }

    /// Removes and returns the head item, if any
    ///
    /// Does not release the dedup marker; the consumer calls
    /// [`complete`](Self::complete) once processing concludes if the key
    /// should become submittable again.
    pub fn try_dequeue(&self) -> Option<(K, M)> {
        let mut inner = self.inner.lock().unwrap();
        inner.buffer.pop_front()
    }

    /// Releases a key's dedup marker
    ///
    /// Returns whether the key was actually tracked. Safe to call multiple
    /// times; subsequent calls return `false`.
    pub fn complete(&self, key: &K) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.tracked.remove(key)
    }

    /// Closes the write side
    ///
    /// Further enqueues fail with [`QueueError::Closed`]. Items already queued
    /// remain consumable; consumers observe end-of-stream through
    /// [`is_drained`](Self::is_drained) once the buffer empties.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
    }

    /// Returns whether the write side has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Returns whether the queue is closed for writing and fully consumed
    pub fn is_drained(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.closed && inner.buffer.is_empty()
    }

    /// Returns whether `key` is currently tracked
    ///
    /// Eventually consistent under concurrent mutation.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().unwrap().tracked.contains(key)
    }

    /// Number of tracked keys (queued plus in flight)
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().tracked.len()
    }

    /// Returns whether no keys are tracked
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().tracked.is_empty()
    }

    /// Number of items awaiting consumption
    pub fn queued_len(&self) -> usize {
        self.inner.lock().unwrap().buffer.len()
    }

    /// Discards all queued items and forgets all tracked keys
    ///
    /// Teardown only. Keys cleared this way are forgotten, not completed; the
    /// queue makes no attempt to notify consumers.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.buffer.clear();
        inner.tracked.clear();
    }
}

impl<K, M> Default for DedupQueue<K, M>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_enqueue_and_dequeue() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();

        assert!(queue.try_enqueue("a".to_string(), 1).unwrap());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.queued_len(), 1);

        let (key, meta) = queue.try_dequeue().unwrap();
        assert_eq!(key, "a");
        assert_eq!(meta, 1);

        // Dequeue does not release the marker
        assert!(queue.contains(&"a".to_string()));
        assert_eq!(queue.queued_len(), 0);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();

        assert!(queue.try_enqueue("a".to_string(), 1).unwrap());
        assert!(!queue.try_enqueue("a".to_string(), 2).unwrap());

        // Still rejected after dequeue, until complete is called
        queue.try_dequeue().unwrap();
        assert!(!queue.try_enqueue("a".to_string(), 3).unwrap());
    }

    #[test]
    fn test_fifo_delivery_order() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();

        for (i, key) in ["k1", "k2", "k3"].iter().enumerate() {
            queue.try_enqueue(key.to_string(), i as u32).unwrap();
        }

        assert_eq!(queue.try_dequeue().unwrap().0, "k1");
        assert_eq!(queue.try_dequeue().unwrap().0, "k2");
        assert_eq!(queue.try_dequeue().unwrap().0, "k3");
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_release_and_resubmit_delivers_fresh_metadata() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();

        queue.try_enqueue("a".to_string(), 1).unwrap();
        queue.try_dequeue().unwrap();

        assert!(queue.complete(&"a".to_string()));
        // Idempotent-safe
        assert!(!queue.complete(&"a".to_string()));

        assert!(queue.try_enqueue("a".to_string(), 2).unwrap());
        let (_, meta) = queue.try_dequeue().unwrap();
        assert_eq!(meta, 2);
    }

    #[test]
    fn test_rollback_on_closed_writer() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();
        queue.close();

        assert_eq!(
            queue.try_enqueue("a".to_string(), 1),
            Err(QueueError::Closed)
        );

        // The dedup marker must not leak from the failed write
        assert!(!queue.contains(&"a".to_string()));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_close_keeps_queued_items_consumable() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();
        queue.try_enqueue("a".to_string(), 1).unwrap();
        queue.try_enqueue("b".to_string(), 2).unwrap();

        queue.close();
        assert!(!queue.is_drained());

        assert_eq!(queue.try_dequeue().unwrap().0, "a");
        assert_eq!(queue.try_dequeue().unwrap().0, "b");
        assert!(queue.is_drained());
    }

    #[test]
    fn test_clear_forgets_keys() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();
        queue.try_enqueue("a".to_string(), 1).unwrap();
        queue.try_enqueue("b".to_string(), 2).unwrap();

        queue.clear();

        assert_eq!(queue.len(), 0);
        assert_eq!(queue.queued_len(), 0);
        assert!(queue.try_dequeue().is_none());
        // Forgotten keys can be enqueued again
        assert!(queue.try_enqueue("a".to_string(), 3).unwrap());
    }

    #[test]
    fn test_observer_fires_once_per_successful_enqueue() {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = count.clone();
        let queue: DedupQueue<String, u32> =
            DedupQueue::with_observer(move |_key, _meta| {
                observed.fetch_add(1, Ordering::SeqCst);
            });

        queue.try_enqueue("a".to_string(), 1).unwrap();
        queue.try_enqueue("a".to_string(), 2).unwrap(); // duplicate, no callback
        queue.try_enqueue("b".to_string(), 3).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_enqueue_same_key_single_winner() {
        let queue: Arc<DedupQueue<String, usize>> = Arc::new(DedupQueue::new());
        let successes = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let queue = queue.clone();
                let successes = successes.clone();
                std::thread::spawn(move || {
                    if queue.try_enqueue("contested".to_string(), i).unwrap() {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(queue.queued_len(), 1);
    }

    #[tokio::test]
    async fn test_async_enqueue_rolls_back_on_cancellation() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            queue.enqueue("a".to_string(), 1, &cancel).await,
            Err(QueueError::Cancelled)
        );
        assert!(!queue.contains(&"a".to_string()));

        // The same key succeeds once cancellation is not in effect
        let healthy = CancellationToken::new();
        assert!(queue.enqueue("a".to_string(), 1, &healthy).await.unwrap());
    }

    #[tokio::test]
    async fn test_async_enqueue_dedups() {
        let queue: DedupQueue<String, u32> = DedupQueue::new();
        let cancel = CancellationToken::new();

        assert!(queue.enqueue("a".to_string(), 1, &cancel).await.unwrap());
        assert!(!queue.enqueue("a".to_string(), 2, &cancel).await.unwrap());
        assert_eq!(queue.queued_len(), 1);
    }
}
