//! Crawler trait - sitemap discovery and single-page fetching.

use async_trait::async_trait;

use crate::error::CrawlResult;

/// Discovers candidate links for a site and fetches raw page HTML.
///
/// Fetching carries no built-in retry: failures propagate tagged with
/// the offending URL, and the caller decides retry policy at the batch
/// or job level.
#[async_trait]
pub trait SiteCrawler: Send + Sync {
    /// Fetch and parse the site's sitemap, returning its page URLs.
    ///
    /// The sitemap location is inferred from the site URL; sitemap
    /// index files are not recursed into.
    async fn sitemap_links(&self, site_url: &str) -> CrawlResult<Vec<String>>;

    /// Fetch the raw HTML of a single page.
    async fn crawl(&self, url: &str) -> CrawlResult<String>;
}

#[async_trait]
impl<T: SiteCrawler + ?Sized> SiteCrawler for std::sync::Arc<T> {
    async fn sitemap_links(&self, site_url: &str) -> CrawlResult<Vec<String>> {
        (**self).sitemap_links(site_url).await
    }

    async fn crawl(&self, url: &str) -> CrawlResult<String> {
        (**self).crawl(url).await
    }
}
