//! Storage traits for jobs, documents, and embeddings.
//!
//! The storage layer is split into focused traits so backends can be
//! substituted independently:
//! - `JobStore`: crawl-job rows and their progress counters
//! - `DocumentStore`: ingested documents
//! - `EmbeddingStore`: vector rows and the content-hash dedup lookup

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::{Document, EmbeddedChunk, Job, NewDocument, NewJob};

/// Store for crawl-job rows.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job. `tasks_count` is the total number of links the
    /// job will process, not the number of queue tasks.
    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job>;

    /// Fetch a job by id.
    async fn get_job(&self, id: i64) -> StoreResult<Job>;

    /// Atomically add a task's progress to the job counters and return
    /// the updated row.
    ///
    /// The increment happens at the store (`x = x + delta`), never as a
    /// read-modify-write in the caller: multiple tasks belonging to the
    /// same job run concurrently, and per-caller arithmetic would lose
    /// updates. The store also flips the status to completed (stamping
    /// `completed_at`) once `tasks_completed_count` reaches
    /// `tasks_count`.
    async fn add_progress(&self, id: i64, processed: i64, succeeded: i64) -> StoreResult<Job>;
}

/// Store for ingested documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the stored row.
    async fn insert_document(&self, document: &NewDocument) -> StoreResult<Document>;
}

/// Store for embedded chunks (vector rows plus metadata).
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Whether any chunk for this chatbot carries this content hash.
    ///
    /// Existence-only: no payload is fetched. This is the dedup gate;
    /// the key is (chatbot_id, hash).
    async fn exists_by_hash(&self, chatbot_id: Uuid, hash: &str) -> StoreResult<bool>;

    /// Append embedded chunks to the vector store.
    ///
    /// Rows are appended independently; a failure part-way through
    /// leaves earlier rows in place. Callers account for the call as a
    /// whole.
    async fn add_documents(&self, chunks: &[EmbeddedChunk]) -> StoreResult<()>;
}
