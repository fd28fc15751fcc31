//! HTTP crawler - sitemap resolution and single-page fetching.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};
use crate::traits::SiteCrawler;
use crate::types::CrawlFilters;

/// HTTP crawler backed by reqwest.
///
/// One GET per page, no built-in retry; a browser-like User-Agent and
/// a bounded redirect policy keep static sites happy.
pub struct HttpCrawler {
    client: reqwest::Client,
}

impl HttpCrawler {
    pub fn new() -> CrawlResult<Self> {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| CrawlError::Fetch {
                url: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    async fn fetch_text(&self, url: &str) -> CrawlResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        response.text().await.map_err(|e| CrawlError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SiteCrawler for HttpCrawler {
    async fn sitemap_links(&self, site_url: &str) -> CrawlResult<Vec<String>> {
        let sitemap_url = sitemap_url(site_url);
        let xml = self.fetch_text(&sitemap_url).await?;
        parse_sitemap(&xml, &sitemap_url)
    }

    async fn crawl(&self, url: &str) -> CrawlResult<String> {
        self.fetch_text(url).await
    }
}

/// Infer the sitemap location from a site URL. A URL that already ends
/// in `.xml` is assumed to be the sitemap itself.
///
/// Sitemaps that live elsewhere (robots.txt `Sitemap:` entries, index
/// files) are not discovered; this is a known limitation.
pub fn sitemap_url(site_url: &str) -> String {
    if site_url.ends_with(".xml") {
        return site_url.to_string();
    }

    format!("{}/sitemap.xml", site_url.trim_end_matches('/'))
}

/// Extract `<loc>` entries from sitemap XML.
fn parse_sitemap(xml: &str, sitemap_url: &str) -> CrawlResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut links = Vec::new();
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(text)) if in_loc => {
                let loc = text.unescape().map_err(|e| CrawlError::InvalidSitemap {
                    url: sitemap_url.to_string(),
                    reason: e.to_string(),
                })?;
                let loc = loc.trim();
                if !loc.is_empty() {
                    links.push(loc.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CrawlError::InvalidSitemap {
                    url: sitemap_url.to_string(),
                    reason: e.to_string(),
                })
            }
        }
        buf.clear();
    }

    Ok(links)
}

/// Apply allow/disallow substring filters to a link list, preserving
/// order. The result is always a subset of the input.
pub fn filter_links(links: &[String], filters: &CrawlFilters) -> Vec<String> {
    links
        .iter()
        .filter(|link| filters.matches(link))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/</loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url>
    <loc>https://example.com/docs/intro</loc>
  </url>
  <url>
    <loc>https://example.com/pricing</loc>
  </url>
</urlset>"#;

    #[test]
    fn test_sitemap_url_inference() {
        assert_eq!(
            sitemap_url("https://example.com"),
            "https://example.com/sitemap.xml"
        );
        assert_eq!(
            sitemap_url("https://example.com/"),
            "https://example.com/sitemap.xml"
        );
        assert_eq!(
            sitemap_url("https://example.com/custom-map.xml"),
            "https://example.com/custom-map.xml"
        );
    }

    #[test]
    fn test_parse_sitemap_collects_locs() {
        let links = parse_sitemap(SITEMAP, "https://example.com/sitemap.xml").unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.com/",
                "https://example.com/docs/intro",
                "https://example.com/pricing",
            ]
        );
    }

    #[test]
    fn test_parse_sitemap_rejects_broken_xml() {
        let err = parse_sitemap("<urlset><url><loc>x</url>", "https://example.com/sitemap.xml");
        assert!(err.is_err());
    }

    #[test]
    fn test_filter_links_is_a_subset_preserving_order() {
        let links: Vec<String> = parse_sitemap(SITEMAP, "sitemap").unwrap();
        let filters = CrawlFilters {
            allow: vec![],
            disallow: vec!["/pricing".into()],
        };

        let filtered = filter_links(&links, &filters);
        assert_eq!(
            filtered,
            vec!["https://example.com/", "https://example.com/docs/intro"]
        );
        assert!(filtered.iter().all(|l| links.contains(l)));
    }
}
