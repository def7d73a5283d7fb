//! URL handling module for Kumo-Crawl
//!
//! This module provides the origin filter: same-origin membership checks and
//! resolution of relative hrefs against a base URL.

mod origin;

pub use origin::{is_crawlable_href, resolve_href, same_origin};
