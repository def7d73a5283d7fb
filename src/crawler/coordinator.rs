//! Crawl orchestration
//!
//! The orchestrator owns both queues and the cancellation token and walks the
//! crawl through its phases: seed the URL queue, run the worker pool and the
//! result drain, then sequence the shutdown so that nothing already produced
//! is lost — cancel, wait for workers to quiesce, close both queues' write
//! sides, and finally wait for the drain to flush to true exhaustion.

use crate::config::Config;
use crate::crawler::classify::Classifier;
use crate::crawler::drain::run_drain;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher, PageLink};
use crate::crawler::worker::{run_worker, WorkerContext};
use crate::output::{FileSink, ResultSink};
use crate::queue::DedupQueue;
use crate::KumoError;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Crawl lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Seeding,
    Running,
    Draining,
    Stopped,
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlReport {
    /// Seed URLs accepted into the URL queue
    pub seeded: usize,

    /// Records the drain appended to the sink
    pub records_written: usize,
}

/// Owns the queues, the stop signal, and the shutdown sequence
pub struct Orchestrator {
    config: Arc<Config>,
    url_queue: Arc<DedupQueue<String, ()>>,
    result_queue: Arc<DedupQueue<String, PageLink>>,
    classifier: Arc<Classifier>,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Creates an orchestrator for the given configuration
    ///
    /// Both queues get a debug-logging enqueue observer, so every accepted
    /// discovery shows up in the trace without touching the worker code.
    pub fn new(config: Config) -> Self {
        let url_queue = Arc::new(DedupQueue::with_observer(|key: &String, _meta: &()| {
            tracing::debug!("queued for crawl: {}", key);
        }));
        let result_queue = Arc::new(DedupQueue::with_observer(
            |key: &String, record: &PageLink| {
                tracing::debug!("queued for output: {} ({})", key, record.title);
            },
        ));
        let classifier = Arc::new(Classifier::new(&config.classify, &config.seeds.start_url));

        Self {
            config: Arc::new(config),
            url_queue,
            result_queue,
            classifier,
            cancel: CancellationToken::new(),
        }
    }

    /// Handle to the crawl's stop signal
    ///
    /// Cancelling it has the same effect as the operator interrupt.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl to completion
    ///
    /// # Arguments
    ///
    /// * `make_fetcher` - Builds one fetch context per worker
    /// * `sink` - Destination for detail-page records
    /// * `shutdown` - Resolves when the operator requests a stop
    pub async fn run(
        self,
        make_fetcher: impl Fn() -> crate::Result<Arc<dyn PageFetcher>>,
        sink: Box<dyn ResultSink>,
        shutdown: impl Future<Output = ()>,
    ) -> crate::Result<CrawlReport> {
        let mut phase = CrawlPhase::Seeding;
        tracing::info!("crawl phase: {:?}", phase);

        let seeded = self.seed()?;
        tracing::info!("seeded {} URLs", seeded);

        phase = CrawlPhase::Running;
        tracing::info!(
            "crawl phase: {:?} ({} workers)",
            phase,
            self.config.crawler.concurrency
        );

        let poll_interval = Duration::from_millis(self.config.crawler.poll_interval_ms);

        let mut workers = Vec::new();
        for id in 0..self.config.crawler.concurrency as usize {
            let ctx = WorkerContext {
                id,
                fetcher: make_fetcher()?,
                url_queue: self.url_queue.clone(),
                result_queue: self.result_queue.clone(),
                classifier: self.classifier.clone(),
                poll_interval,
                cancel: self.cancel.clone(),
            };
            workers.push(tokio::spawn(run_worker(ctx)));
        }

        let drain = tokio::spawn(run_drain(
            self.result_queue.clone(),
            sink,
            self.cancel.clone(),
            poll_interval,
        ));

        // Running until the operator says stop.
        shutdown.await;
        tracing::info!("stop signal received, cancelling workers");
        self.cancel.cancel();

        // Soft stop: each worker finishes its in-progress fetch first.
        for (id, handle) in workers.into_iter().enumerate() {
            handle
                .await
                .map_err(|e| KumoError::WorkerJoin(format!("worker {}: {}", id, e)))?;
        }

        // No producer is left; close both write sides so the queues observe
        // end-of-stream once their buffers empty.
        self.url_queue.close();
        self.result_queue.close();

        phase = CrawlPhase::Draining;
        tracing::info!(
            "crawl phase: {:?} ({} records pending)",
            phase,
            self.result_queue.queued_len()
        );

        let records_written = drain
            .await
            .map_err(|e| KumoError::WorkerJoin(format!("drain: {}", e)))?;

        // Teardown: forget everything the dedup sets still track.
        self.url_queue.clear();
        self.result_queue.clear();

        phase = CrawlPhase::Stopped;
        tracing::info!(
            "crawl phase: {:?} ({} records written)",
            phase,
            records_written
        );

        Ok(CrawlReport {
            seeded,
            records_written,
        })
    }

    /// Enqueues the start URL and any extra seeds
    ///
    /// Seeds are deduplicated like any other URL; listing a seed twice is
    /// harmless. Returns how many were accepted.
    fn seed(&self) -> crate::Result<usize> {
        let mut accepted = 0;

        let start = &self.config.seeds.start_url;
        for seed in std::iter::once(start).chain(self.config.seeds.urls.iter()) {
            let normalized = Url::parse(seed)?.to_string();
            if self.url_queue.try_enqueue(normalized, ())? {
                accepted += 1;
            }
        }

        Ok(accepted)
    }
}

/// Runs the main crawl operation with production collaborators
///
/// Builds the flat-file sink and one HTTP fetch context per worker, then runs
/// until the operator interrupts with Ctrl-C.
///
/// # Example
///
/// ```no_run
/// use kumo_crawl::config::load_config;
/// use kumo_crawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// run_crawl(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> crate::Result<CrawlReport> {
    let sink = FileSink::open(Path::new(&config.output.results_path))?;

    let start_url = config.seeds.start_url.clone();
    let user_agent = config.fetcher.user_agent.clone();
    let timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);

    let make_fetcher = move || -> crate::Result<Arc<dyn PageFetcher>> {
        let fetcher = HttpFetcher::new(&start_url, &user_agent, timeout)?;
        Ok(Arc::new(fetcher))
    };

    let orchestrator = Orchestrator::new(config);
    orchestrator
        .run(make_fetcher, Box::new(sink), async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("interrupt received");
        })
        .await
}
