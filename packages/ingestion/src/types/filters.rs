//! Crawl filters - substring allow/disallow patterns for sitemap links.

use serde::{Deserialize, Serialize};

/// Allow/disallow substring patterns applied to sitemap links.
///
/// Patterns are plain substring matches, not globs or regexes; this is
/// intentional and matches the product behavior. Empty patterns are
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlFilters {
    /// Keep a link only if it contains at least one of these
    /// (an empty list keeps everything)
    #[serde(default)]
    pub allow: Vec<String>,

    /// Drop a link if it contains any of these
    #[serde(default)]
    pub disallow: Vec<String>,
}

impl CrawlFilters {
    /// Filters that keep every link.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether a link passes the allow and disallow lists.
    pub fn matches(&self, link: &str) -> bool {
        let allow: Vec<&String> = self.allow.iter().filter(|p| !p.is_empty()).collect();
        let disallow: Vec<&String> = self.disallow.iter().filter(|p| !p.is_empty()).collect();

        let allowed = allow.is_empty() || allow.iter().any(|p| link.contains(p.as_str()));
        let disallowed = disallow.iter().any(|p| link.contains(p.as_str()));

        allowed && !disallowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_keep_everything() {
        let filters = CrawlFilters::none();
        assert!(filters.matches("https://example.com/docs/intro"));
    }

    #[test]
    fn test_allow_requires_one_match() {
        let filters = CrawlFilters {
            allow: vec!["/docs".into(), "/blog".into()],
            disallow: vec![],
        };
        assert!(filters.matches("https://example.com/docs/intro"));
        assert!(filters.matches("https://example.com/blog/post"));
        assert!(!filters.matches("https://example.com/pricing"));
    }

    #[test]
    fn test_disallow_wins_over_allow() {
        let filters = CrawlFilters {
            allow: vec!["/docs".into()],
            disallow: vec!["/docs/internal".into()],
        };
        assert!(filters.matches("https://example.com/docs/intro"));
        assert!(!filters.matches("https://example.com/docs/internal/secrets"));
    }

    #[test]
    fn test_empty_patterns_are_ignored() {
        let filters = CrawlFilters {
            allow: vec![String::new()],
            disallow: vec![String::new()],
        };
        // An empty allow pattern must not filter everything out, and an
        // empty disallow pattern must not match every link.
        assert!(filters.matches("https://example.com/page"));
    }
}
