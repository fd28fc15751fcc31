//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the ingestion
//! library without making real network, queue, or embedding calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{CrawlError, CrawlResult, EmbedError, QueueError, StoreError, StoreResult};
use crate::traits::{ChatbotDirectory, Embedder, QuotaGate, SiteCrawler, TaskQueue};
use crate::types::{Chatbot, EnqueueOptions, EnqueuedTask, TaskPayload};

/// A mock crawler serving canned sitemaps and pages.
#[derive(Default)]
pub struct MockCrawler {
    /// Sitemap link lists by site URL
    sitemaps: Arc<RwLock<HashMap<String, Vec<String>>>>,

    /// Page HTML by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// URLs whose fetch always fails
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MockCrawler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these links for a site's sitemap.
    pub fn with_sitemap(self, site_url: impl Into<String>, links: Vec<String>) -> Self {
        self.sitemaps.write().unwrap().insert(site_url.into(), links);
        self
    }

    /// Serve this HTML for a page URL.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Make every fetch of this URL fail.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(url.into());
        self
    }
}

#[async_trait]
impl SiteCrawler for MockCrawler {
    async fn sitemap_links(&self, site_url: &str) -> CrawlResult<Vec<String>> {
        self.sitemaps
            .read()
            .unwrap()
            .get(site_url)
            .cloned()
            .ok_or_else(|| CrawlError::Fetch {
                url: site_url.to_string(),
                reason: "no sitemap configured".into(),
            })
    }

    async fn crawl(&self, url: &str) -> CrawlResult<String> {
        if self.failing.read().unwrap().contains(url) {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                reason: "configured failure".into(),
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CrawlError::Fetch {
                url: url.to_string(),
                reason: "no page configured".into(),
            })
    }
}

/// A mock embedder producing deterministic fixed-dimension vectors.
pub struct MockEmbedder {
    dim: usize,
    failing: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            dim: 8,
            failing: false,
        }
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Make every embed call fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.failing {
            return Err(EmbedError("configured failure".into()));
        }

        // Length-derived so different texts usually differ.
        let seed = text.len() as f32;
        Ok((0..self.dim).map(|i| seed + i as f32).collect())
    }
}

/// A mock queue that records published tasks instead of delivering
/// them.
#[derive(Default)]
pub struct MockQueue {
    published: Arc<RwLock<Vec<(TaskPayload, EnqueueOptions)>>>,

    /// When set, `verify` rejects every signature.
    reject_signatures: bool,

    /// When set, every publish fails.
    fail_publishes: bool,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every inbound signature.
    pub fn rejecting_signatures(mut self) -> Self {
        self.reject_signatures = true;
        self
    }

    /// Fail every publish.
    pub fn failing_publishes(mut self) -> Self {
        self.fail_publishes = true;
        self
    }

    /// Tasks published so far, in publish order.
    pub fn published(&self) -> Vec<(TaskPayload, EnqueueOptions)> {
        self.published.read().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueue for MockQueue {
    async fn enqueue(
        &self,
        task: &TaskPayload,
        options: EnqueueOptions,
    ) -> Result<EnqueuedTask, QueueError> {
        if self.fail_publishes {
            return Err(QueueError::Publish("configured failure".into()));
        }

        let mut published = self.published.write().unwrap();
        published.push((task.clone(), options));
        Ok(EnqueuedTask {
            message_id: format!("msg-{}", published.len()),
        })
    }

    fn verify(&self, _body: &[u8], _signature: &str) -> Result<(), QueueError> {
        if self.reject_signatures {
            return Err(QueueError::InvalidSignature);
        }
        Ok(())
    }
}

/// A mock chatbot directory with preloaded records.
#[derive(Default)]
pub struct MockDirectory {
    chatbots: Arc<RwLock<HashMap<Uuid, Chatbot>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chatbot(self, chatbot: Chatbot) -> Self {
        self.chatbots.write().unwrap().insert(chatbot.id, chatbot);
        self
    }
}

#[async_trait]
impl ChatbotDirectory for MockDirectory {
    async fn get_chatbot(&self, id: Uuid) -> StoreResult<Chatbot> {
        self.chatbots
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "chatbot",
                id: id.to_string(),
            })
    }
}

/// A mock quota gate with a fixed answer.
pub struct MockQuotaGate {
    allow: bool,
}

impl MockQuotaGate {
    /// Gate that approves every request.
    pub fn allowing() -> Self {
        Self { allow: true }
    }

    /// Gate that denies every request.
    pub fn denying() -> Self {
        Self { allow: false }
    }
}

#[async_trait]
impl QuotaGate for MockQuotaGate {
    async fn can_index_documents(
        &self,
        _organization_id: i64,
        _requested: usize,
    ) -> StoreResult<bool> {
        Ok(self.allow)
    }
}
