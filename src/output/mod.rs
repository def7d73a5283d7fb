//! Output handling for Kumo-Crawl
//!
//! This module defines the sink interface the result drain writes through,
//! plus the flat-file implementation used in production. Any durable store
//! satisfies the contract; append is a pure side effect.

mod file_sink;

pub use file_sink::FileSink;

use crate::crawler::PageLink;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for completed crawl records
///
/// Implementations append one record at a time; the drain is the only writer,
/// so appends are effectively ordered. A failed append must leave the sink
/// usable for subsequent records.
pub trait ResultSink: Send {
    /// Appends a single record
    fn append(&mut self, record: &PageLink) -> OutputResult<()>;
}
