//! Kumo-Crawl: a same-origin link crawler
//!
//! This crate implements a concurrent link crawler built around a deduplicating
//! work queue: each discovered URL is queued at most once while in flight, a
//! fixed-size worker pool fetches pages and classifies their links, and a
//! separate drain task persists detail-page records to a flat file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod queue;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo-Crawl operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Queue error: {0}")]
    Queue(#[from] queue::QueueError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    WorkerJoin(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Failed to resolve href '{href}' against {base}")]
    Resolve { base: String, href: String },
}

/// Result type alias for Kumo-Crawl operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{PageFetcher, PageLink};
pub use queue::DedupQueue;
pub use crate::url::{resolve_href, same_origin};
