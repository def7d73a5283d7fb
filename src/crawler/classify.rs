//! Link classification rule table
//!
//! Routes an origin-filtered href into one of two disjoint categories, or
//! discards it. Kept as a small pure function over an explicit pattern table
//! so rules can be extended without touching the worker loop.

use crate::config::ClassifyConfig;
use crate::url::resolve_href;
use url::Url;

/// Where a discovered link should be routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// A detail (content) page: route the record to the result queue
    Record,

    /// A navigational or listing page: feed the resolved URL back to the
    /// URL queue
    Follow(Url),

    /// Matches neither rule; not an error
    Discard,
}

/// Classifies hrefs by substring rules, detail rules taking precedence
pub struct Classifier {
    detail_patterns: Vec<String>,
    listing_patterns: Vec<String>,
    start_url: String,
}

impl Classifier {
    /// Builds a classifier for a crawl rooted at `start_url`
    pub fn new(rules: &ClassifyConfig, start_url: &str) -> Self {
        Self {
            detail_patterns: rules.detail_patterns.clone(),
            listing_patterns: rules.listing_patterns.clone(),
            start_url: start_url.to_string(),
        }
    }

    /// Classifies a single href
    ///
    /// Rules, in precedence order:
    /// 1. Contains a detail pattern -> [`LinkAction::Record`]
    /// 2. Contains a `#` or a listing pattern -> [`LinkAction::Follow`] with
    ///    the href resolved against the start URL (fragment-only and relative
    ///    hrefs become absolute)
    /// 3. Otherwise -> [`LinkAction::Discard`]
    ///
    /// An href that matches rule 2 but fails to resolve is discarded.
    pub fn classify(&self, href: &str) -> LinkAction {
        if self.detail_patterns.iter().any(|p| href.contains(p)) {
            return LinkAction::Record;
        }

        if href.contains('#') || self.listing_patterns.iter().any(|p| href.contains(p)) {
            return match resolve_href(&self.start_url, href) {
                Ok(resolved) => LinkAction::Follow(resolved),
                Err(_) => LinkAction::Discard,
            };
        }

        LinkAction::Discard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&ClassifyConfig::default(), "https://example.com")
    }

    #[test]
    fn test_detail_link_routed_to_record() {
        assert_eq!(classifier().classify("/sites/42"), LinkAction::Record);
    }

    #[test]
    fn test_fragment_link_resolved_and_followed() {
        match classifier().classify("#section") {
            LinkAction::Follow(url) => {
                assert_eq!(url.as_str(), "https://example.com/#section");
            }
            other => panic!("expected Follow, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_link_followed() {
        match classifier().classify("/favorites/x") {
            LinkAction::Follow(url) => {
                assert_eq!(url.as_str(), "https://example.com/favorites/x");
            }
            other => panic!("expected Follow, got {:?}", other),
        }
    }

    #[test]
    fn test_unmatched_link_discarded() {
        assert_eq!(classifier().classify("/about"), LinkAction::Discard);
    }

    #[test]
    fn test_detail_takes_precedence_over_listing() {
        // Matches both rule sets; detail wins.
        assert_eq!(
            classifier().classify("/sites/42#reviews"),
            LinkAction::Record
        );
    }

    #[test]
    fn test_absolute_listing_link_passes_through() {
        match classifier().classify("https://example.com/favorites/y") {
            LinkAction::Follow(url) => {
                assert_eq!(url.as_str(), "https://example.com/favorites/y");
            }
            other => panic!("expected Follow, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = ClassifyConfig {
            detail_patterns: vec!["/product/".to_string()],
            listing_patterns: vec!["/category/".to_string()],
        };
        let classifier = Classifier::new(&rules, "https://shop.test");

        assert_eq!(classifier.classify("/product/7"), LinkAction::Record);
        assert!(matches!(
            classifier.classify("/category/tools"),
            LinkAction::Follow(_)
        ));
        assert_eq!(classifier.classify("/sites/42"), LinkAction::Discard);
    }
}
