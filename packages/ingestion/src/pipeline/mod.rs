//! The ingestion pipeline: job creation and task execution.

pub mod create_job;
pub mod execute_task;

use std::sync::Arc;
use std::time::Duration;

use crate::traits::{
    ChatbotDirectory, DocumentStore, Embedder, EmbeddingStore, JobStore, QuotaGate, SiteCrawler,
    TaskQueue,
};

pub use create_job::create_job;
pub use execute_task::{execute_task, TaskReport};

/// Upper bound on links per queue task; bounds a single task's crawl
/// duration and memory.
pub const MAX_LINKS_PER_JOB: usize = 30;

/// Per-task delivery delay step; task i is delivered i steps late so
/// the target site is not hammered by every slice at once.
pub const DELAY_BETWEEN_JOBS: Duration = Duration::from_millis(500);

/// Pause between enqueue batches.
pub const DELAY_BETWEEN_TASKS: Duration = Duration::from_secs(25);

/// Concurrent task publishes during job creation.
pub const ENQUEUE_CONCURRENCY: usize = 2;

/// Concurrent link crawls within one task execution.
pub const LINK_CONCURRENCY: usize = 2;

/// Pause between link batches within one task execution.
pub const DELAY_BETWEEN_LINKS: Duration = Duration::from_millis(1000);

/// Default chunk size (characters) for document splitting.
pub const DEFAULT_CHUNK_SIZE: usize = 1500;

/// Everything the pipeline needs, behind its trait seams. The server
/// wires real backends in; tests wire mocks.
#[derive(Clone)]
pub struct PipelineDeps {
    pub crawler: Arc<dyn SiteCrawler>,
    pub directory: Arc<dyn ChatbotDirectory>,
    pub quota: Arc<dyn QuotaGate>,
    pub jobs: Arc<dyn JobStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub embeddings: Arc<dyn EmbeddingStore>,
    pub embedder: Arc<dyn Embedder>,
    pub queue: Arc<dyn TaskQueue>,

    /// Chunk size in characters for document splitting.
    pub chunk_size: usize,
}
