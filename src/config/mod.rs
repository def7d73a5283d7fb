//! Configuration module for Kumo-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use kumo_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifyConfig, Config, CrawlerConfig, FetcherConfig, OutputConfig, SeedConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
