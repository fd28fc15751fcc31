//! In-memory store backend.
//!
//! Implements every storage trait over `HashMap`s behind `RwLock`s.
//! Used by tests and useful for running the pipeline without a
//! database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, EmbeddingStore, JobStore};
use crate::types::{Document, EmbeddedChunk, Job, JobStatus, NewDocument, NewJob};

/// In-memory store covering jobs, documents, and embeddings.
///
/// Cloning is cheap and shares the underlying state.
#[derive(Default, Clone)]
pub struct MemoryStore {
    jobs: Arc<RwLock<HashMap<i64, Job>>>,
    documents: Arc<RwLock<HashMap<i64, Document>>>,
    chunks: Arc<RwLock<Vec<EmbeddedChunk>>>,
    next_job_id: Arc<AtomicI64>,
    next_document_id: Arc<AtomicI64>,
    job_reads: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_job_id: Arc::new(AtomicI64::new(1)),
            next_document_id: Arc::new(AtomicI64::new(1)),
            ..Default::default()
        }
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Number of stored embedded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().unwrap().len()
    }

    /// How many times a job row has been read. Lets tests assert that
    /// rejected requests never touched storage.
    pub fn job_reads(&self) -> usize {
        self.job_reads.load(Ordering::SeqCst)
    }

    /// Number of stored jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job> {
        let id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        let row = Job {
            id,
            chatbot_id: job.chatbot_id,
            organization_id: job.organization_id,
            status: JobStatus::Running,
            tasks_count: job.tasks_count,
            tasks_completed_count: 0,
            tasks_succeeded_count: 0,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.jobs.write().unwrap().insert(id, row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: i64) -> StoreResult<Job> {
        self.job_reads.fetch_add(1, Ordering::SeqCst);
        self.jobs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "job",
                id: id.to_string(),
            })
    }

    async fn add_progress(&self, id: i64, processed: i64, succeeded: i64) -> StoreResult<Job> {
        let mut jobs = self.jobs.write().unwrap();
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "job",
            id: id.to_string(),
        })?;

        // The write lock makes the increment atomic, mirroring the SQL
        // backend's single UPDATE.
        job.tasks_completed_count += processed;
        job.tasks_succeeded_count += succeeded;
        if job.is_finished() && job.completed_at.is_none() {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
        }

        Ok(job.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, document: &NewDocument) -> StoreResult<Document> {
        let id = self.next_document_id.fetch_add(1, Ordering::SeqCst);
        let row = Document {
            id,
            chatbot_id: document.chatbot_id,
            organization_id: document.organization_id,
            title: document.title.clone(),
            content: document.content.clone(),
            created_at: Utc::now(),
        };
        self.documents.write().unwrap().insert(id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl EmbeddingStore for MemoryStore {
    async fn exists_by_hash(&self, chatbot_id: Uuid, hash: &str) -> StoreResult<bool> {
        Ok(self
            .chunks
            .read()
            .unwrap()
            .iter()
            .any(|c| c.metadata.chatbot_id == chatbot_id && c.metadata.hash == hash))
    }

    async fn add_documents(&self, chunks: &[EmbeddedChunk]) -> StoreResult<()> {
        self.chunks.write().unwrap().extend_from_slice(chunks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_job(tasks: i64) -> NewJob {
        NewJob {
            chatbot_id: Uuid::new_v4(),
            organization_id: 1,
            tasks_count: tasks,
        }
    }

    #[tokio::test]
    async fn test_progress_accumulates_and_completes() {
        let store = MemoryStore::new();
        let job = store.insert_job(&new_job(5)).await.unwrap();
        assert_eq!(job.status, JobStatus::Running);

        let job = store.add_progress(job.id, 3, 2).await.unwrap();
        assert_eq!(job.tasks_completed_count, 3);
        assert_eq!(job.tasks_succeeded_count, 2);
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.completed_at.is_none());

        let job = store.add_progress(job.id, 2, 2).await.unwrap();
        assert_eq!(job.tasks_completed_count, 5);
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_job(42).await,
            Err(StoreError::NotFound { entity: "job", .. })
        ));
        assert!(store.add_progress(42, 1, 1).await.is_err());
    }
}
