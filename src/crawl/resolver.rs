// src/crawl/resolver.rs
// =============================================================================
// Turns raw href values into absolute URLs and decides what to do with them.
//
// Three questions get answered here:
// 1. Should this href be ignored outright? (exclusion substrings)
// 2. What absolute URL does it point to? (resolution against the page URL)
// 3. Is that URL part of the site we're crawling? (internal vs external)
//
// Rust concepts:
// - Option<T>: "this href doesn't resolve" is a normal outcome, not an error
// - Result<T, E>: asking about an unparseable URL IS a caller bug, so it errors
// =============================================================================

use crate::config::Config;
use crate::error::{CrawlError, Result};
use url::Url;

#[derive(Debug, Clone)]
pub struct LinkResolver {
    seed: Url,
    exclude_patterns: Vec<String>,
}

impl LinkResolver {
    pub fn new(config: &Config) -> Result<Self> {
        let seed = Url::parse(&config.start_url).map_err(|e| CrawlError::InvalidUrl {
            url: config.start_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            seed,
            exclude_patterns: config.exclude_patterns.clone(),
        })
    }

    // Resolves a possibly-relative link against the page it was found on
    //
    // Returns None for:
    //   - empty links
    //   - links containing whitespace or < >
    //   - relative links that don't start with /, ./ or ../ (e.g. "page.html", "#top")
    //
    // Examples (base = "https://example.com/docs/"):
    //   "/about"            -> Some("https://example.com/about")
    //   "../other"          -> Some("https://example.com/other")
    //   "//cdn.example.com" -> Some("https://cdn.example.com/")
    //   "https://other.com" -> Some("https://other.com/")
    pub fn normalize(&self, link: &str, base: &str) -> Option<String> {
        if link.is_empty() || link.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
            return None;
        }

        // Already absolute? Then the base doesn't matter.
        if let Ok(url) = Url::parse(link) {
            return Some(url.to_string());
        }

        if !(link.starts_with('/') || link.starts_with("./") || link.starts_with("../")) {
            return None;
        }

        let base = Url::parse(base).ok()?;
        base.join(link).ok().map(|url| url.to_string())
    }

    /// True if the raw href contains any configured exclusion substring.
    pub fn should_exclude(&self, link: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| link.contains(pattern.as_str()))
    }

    /// Same scheme and same host name as the seed. Ports are not compared.
    pub fn is_internal(&self, address: &str) -> Result<bool> {
        let url = Url::parse(address).map_err(|e| CrawlError::InvalidUrl {
            url: address.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url.scheme() == self.seed.scheme() && url.host_str() == self.seed.host_str())
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "https://demo.testfire.net";

    fn resolver() -> LinkResolver {
        LinkResolver::new(&Config::new(SEED)).unwrap()
    }

    #[test]
    fn test_normalize_relative_link() {
        let result = resolver().normalize("/test", SEED);
        assert_eq!(result, Some("https://demo.testfire.net/test".to_string()));
    }

    #[test]
    fn test_normalize_dot_relative_links() {
        let r = resolver();
        let base = "https://demo.testfire.net/docs/guide/";
        assert_eq!(
            r.normalize("./intro", base),
            Some("https://demo.testfire.net/docs/guide/intro".to_string())
        );
        assert_eq!(
            r.normalize("../api", base),
            Some("https://demo.testfire.net/docs/api".to_string())
        );
    }

    #[test]
    fn test_normalize_absolute_link_ignores_base() {
        let result = resolver().normalize("https://other.com/page", SEED);
        assert_eq!(result, Some("https://other.com/page".to_string()));
    }

    #[test]
    fn test_normalize_protocol_relative_uses_base_scheme() {
        let result = resolver().normalize("//demo.testfire.net/test", SEED);
        assert_eq!(result, Some("https://demo.testfire.net/test".to_string()));

        let result = resolver().normalize("//cdn.test/lib.js", "http://plain.test/");
        assert_eq!(result, Some("http://cdn.test/lib.js".to_string()));
    }

    #[test]
    fn test_normalize_rejects_bare_relative_and_fragments() {
        let r = resolver();
        assert_eq!(r.normalize("invalid-url", SEED), None);
        assert_eq!(r.normalize("page.html", SEED), None);
        assert_eq!(r.normalize("#section", SEED), None);
    }

    #[test]
    fn test_normalize_rejects_empty_whitespace_and_brackets() {
        let r = resolver();
        assert_eq!(r.normalize("", SEED), None);
        assert_eq!(r.normalize("/has space", SEED), None);
        assert_eq!(r.normalize("/tab\there", SEED), None);
        assert_eq!(r.normalize("/<script>", SEED), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let r = resolver();
        let once = r.normalize("/a/./b/../c?q=1", SEED).unwrap();
        let twice = r.normalize(&once, "https://elsewhere.test/x/y").unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, "https://demo.testfire.net/a/c?q=1");
    }

    #[test]
    fn test_should_exclude_matches_substrings() {
        let r = resolver();
        assert!(r.should_exclude("mailto:test@example.com"));
        assert!(r.should_exclude("tel:+1234567890"));
        assert!(r.should_exclude("javascript:void(0)"));
        assert!(r.should_exclude("/page#section"));
        assert!(!r.should_exclude("https://demo.testfire.net/valid/page"));
    }

    #[test]
    fn test_should_exclude_is_case_sensitive() {
        let r = resolver();
        assert!(!r.should_exclude("MAILTO:test@example.com"));
    }

    #[test]
    fn test_is_internal() {
        let r = resolver();
        assert!(r.is_internal("https://demo.testfire.net/page").unwrap());
        assert!(r.is_internal("https://demo.testfire.net:8080/page").unwrap());
        assert!(!r.is_internal("https://other.com/page").unwrap());
        assert!(!r.is_internal("http://demo.testfire.net/page").unwrap());
        assert!(!r.is_internal("mailto:someone@demo.testfire.net").unwrap());
    }

    #[test]
    fn test_is_internal_rejects_unparseable() {
        let result = resolver().is_internal("invalid-url");
        assert!(matches!(result, Err(CrawlError::InvalidUrl { .. })));
    }
}
