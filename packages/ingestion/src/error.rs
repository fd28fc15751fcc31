//! Typed errors for the ingestion library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! distinguish per-URL failures from job-fatal ones.

use thiserror::Error;

/// Errors that can occur while discovering or fetching pages.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Network GET failed or returned a non-success status.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Sitemap XML could not be parsed.
    #[error("invalid sitemap at {url}: {reason}")]
    InvalidSitemap { url: String, reason: String },

    /// URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur while extracting readable content.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Extraction produced no usable content or title.
    #[error("no readable content found")]
    NoContent,

    /// HTML to markdown conversion failed.
    #[error("markdown conversion failed: {0}")]
    Markdown(String),
}

/// Errors raised by the durable task queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Signature did not match any known signing key.
    #[error("invalid task signature")]
    InvalidSignature,

    /// Task could not be published to the queue.
    #[error("failed to publish task: {0}")]
    Publish(String),

    /// Queue client is misconfigured.
    #[error("queue misconfigured: {0}")]
    Config(String),
}

/// Error from the external embedding provider.
#[derive(Debug, Error)]
#[error("embedding provider error: {0}")]
pub struct EmbedError(pub String);

/// Errors raised by the relational / vector stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Backend query failed.
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap an arbitrary backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

/// Errors that abort job creation. No job row exists when these are
/// returned.
#[derive(Debug, Error)]
pub enum JobCreationError {
    /// Sitemap could not be fetched or parsed.
    #[error("sitemap crawl failed: {0}")]
    Crawl(#[from] CrawlError),

    /// The organization's document quota does not cover this crawl.
    #[error("organization {organization_id} cannot index {requested} more documents")]
    QuotaExceeded {
        organization_id: i64,
        requested: usize,
    },

    /// The filtered link list was empty.
    #[error("no links found")]
    NoLinksFound,

    /// Chatbot lookup or job insert failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Task publishing failed.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors that escape task execution. Per-link failures never surface
/// here; only job bookkeeping failures do, because they are the only
/// case eligible for queue redelivery.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The job row could not be loaded.
    #[error("job lookup failed: {0}")]
    JobLookup(#[source] StoreError),

    /// The job counters could not be updated.
    #[error("job update failed: {0}")]
    JobUpdate(#[source] StoreError),
}

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
