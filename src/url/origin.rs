//! Same-origin checks and href resolution
//!
//! Two URLs share an origin when their scheme, host, and port are all equal.
//! Relative hrefs are resolved against the base before comparison, so a bare
//! `/path` or `#fragment` href on a page always counts as same-origin.

use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href against a base URL
///
/// Absolute hrefs pass through unchanged; relative hrefs (including
/// fragment-only ones) are joined onto the base.
///
/// # Examples
///
/// ```
/// use kumo_crawl::url::resolve_href;
///
/// let resolved = resolve_href("https://example.com", "/sites/42").unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/sites/42");
///
/// let resolved = resolve_href("https://example.com", "#section").unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/#section");
/// ```
pub fn resolve_href(base: &str, href: &str) -> UrlResult<Url> {
    let base_url = Url::parse(base).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;

    match Url::parse(href) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base_url.join(href).map_err(|_| UrlError::Resolve {
                base: base.to_string(),
                href: href.to_string(),
            })
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", href, e))),
    }
}

/// Decides same-origin membership of an href relative to a base URL
///
/// Compares scheme, host (case-insensitively, via the parser's lowercasing),
/// and effective port after resolving the href against the base. Unparseable
/// input is never same-origin.
pub fn same_origin(base: &str, href: &str) -> bool {
    if base.trim().is_empty() || href.trim().is_empty() {
        return false;
    }

    let base_url = match Url::parse(base) {
        Ok(u) => u,
        Err(_) => return false,
    };

    let href_url = match resolve_href(base, href) {
        Ok(u) => u,
        Err(_) => return false,
    };

    base_url.scheme() == href_url.scheme()
        && base_url.host_str() == href_url.host_str()
        && base_url.port_or_known_default() == href_url.port_or_known_default()
}

/// Returns whether an href is worth presenting for classification at all
///
/// Empty hrefs, bare `#` anchors, and `javascript:` pseudo-links are excluded
/// before any origin or classification logic sees them.
pub fn is_crawlable_href(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && href != "#" && !href.starts_with("javascript:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_identical() {
        assert!(same_origin("https://example.com", "https://example.com/a"));
    }

    #[test]
    fn test_same_origin_relative_href() {
        assert!(same_origin("https://example.com", "/a"));
        assert!(same_origin("https://example.com", "#section"));
    }

    #[test]
    fn test_different_host_not_same_origin() {
        assert!(!same_origin("https://example.com", "https://other.com/a"));
    }

    #[test]
    fn test_different_scheme_not_same_origin() {
        assert!(!same_origin("https://example.com", "http://example.com/a"));
    }

    #[test]
    fn test_different_port_not_same_origin() {
        assert!(!same_origin(
            "https://example.com:8443",
            "https://example.com/a"
        ));
    }

    #[test]
    fn test_default_port_matches_explicit() {
        assert!(same_origin("https://example.com", "https://example.com:443/a"));
    }

    #[test]
    fn test_subdomain_not_same_origin() {
        assert!(!same_origin("https://example.com", "https://sub.example.com/a"));
    }

    #[test]
    fn test_blank_input_not_same_origin() {
        assert!(!same_origin("", "https://example.com"));
        assert!(!same_origin("https://example.com", "  "));
    }

    #[test]
    fn test_malformed_href_not_same_origin() {
        assert!(!same_origin("https://example.com", "http://[bad"));
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let resolved = resolve_href("https://example.com", "https://example.com/x").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_href("https://example.com/base/", "child").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/base/child");
    }

    #[test]
    fn test_resolve_fragment_only() {
        let resolved = resolve_href("https://example.com", "#top").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/#top");
    }

    #[test]
    fn test_resolve_invalid_base_is_error() {
        assert!(resolve_href("not a url", "/a").is_err());
    }

    #[test]
    fn test_crawlable_href_filter() {
        assert!(is_crawlable_href("/sites/42"));
        assert!(is_crawlable_href("#section"));
        assert!(!is_crawlable_href(""));
        assert!(!is_crawlable_href("   "));
        assert!(!is_crawlable_href("#"));
        assert!(!is_crawlable_href("javascript:void(0)"));
    }
}
