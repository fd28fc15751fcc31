//! Postgres implementations of the ingestion storage traits.
//!
//! Jobs and documents live in relational tables; embedded chunks live
//! in a pgvector table with their metadata as JSONB, which is also
//! where the content-hash dedup lookup runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use ingestion::error::{StoreError, StoreResult};
use ingestion::traits::{
    ChatbotDirectory, DocumentStore, EmbeddingStore, JobStore, QuotaGate,
};
use ingestion::types::{
    Chatbot, Document, EmbeddedChunk, Job, JobStatus, NewDocument, NewJob,
};

#[derive(FromRow)]
struct JobRow {
    id: i64,
    chatbot_id: Uuid,
    organization_id: i64,
    status: String,
    tasks_count: i64,
    tasks_completed_count: i64,
    tasks_succeeded_count: i64,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl JobRow {
    fn into_job(self) -> StoreResult<Job> {
        let status: JobStatus = self
            .status
            .parse()
            .map_err(|e: String| StoreError::Backend(e.into()))?;

        Ok(Job {
            id: self.id,
            chatbot_id: self.chatbot_id,
            organization_id: self.organization_id,
            status,
            tasks_count: self.tasks_count,
            tasks_completed_count: self.tasks_completed_count,
            tasks_succeeded_count: self.tasks_succeeded_count,
            created_at: self.created_at,
            completed_at: self.completed_at,
        })
    }
}

/// Job store over the `jobs` table.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert_job(&self, job: &NewJob) -> StoreResult<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (chatbot_id, organization_id, status, tasks_count)
            VALUES ($1, $2, 'running', $3)
            RETURNING id, chatbot_id, organization_id, status, tasks_count,
                      tasks_completed_count, tasks_succeeded_count,
                      created_at, completed_at
            "#,
        )
        .bind(job.chatbot_id)
        .bind(job.organization_id)
        .bind(job.tasks_count)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.into_job()
    }

    async fn get_job(&self, id: i64) -> StoreResult<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, chatbot_id, organization_id, status, tasks_count,
                   tasks_completed_count, tasks_succeeded_count,
                   created_at, completed_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or(StoreError::NotFound {
            entity: "job",
            id: id.to_string(),
        })?;

        row.into_job()
    }

    async fn add_progress(&self, id: i64, processed: i64, succeeded: i64) -> StoreResult<Job> {
        // Single atomic UPDATE: concurrent tasks belonging to the same
        // job must not lose each other's increments.
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET tasks_completed_count = tasks_completed_count + $2,
                tasks_succeeded_count = tasks_succeeded_count + $3,
                status = CASE
                    WHEN tasks_completed_count + $2 >= tasks_count THEN 'completed'
                    ELSE status
                END,
                completed_at = CASE
                    WHEN tasks_completed_count + $2 >= tasks_count THEN NOW()
                    ELSE completed_at
                END
            WHERE id = $1
            RETURNING id, chatbot_id, organization_id, status, tasks_count,
                      tasks_completed_count, tasks_succeeded_count,
                      created_at, completed_at
            "#,
        )
        .bind(id)
        .bind(processed)
        .bind(succeeded)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or(StoreError::NotFound {
            entity: "job",
            id: id.to_string(),
        })?;

        row.into_job()
    }
}

#[derive(FromRow)]
struct DocumentRow {
    id: i64,
    chatbot_id: Uuid,
    organization_id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

/// Document store over the `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_document(&self, document: &NewDocument) -> StoreResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (chatbot_id, organization_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chatbot_id, organization_id, title, content, created_at
            "#,
        )
        .bind(document.chatbot_id)
        .bind(document.organization_id)
        .bind(&document.title)
        .bind(&document.content)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(Document {
            id: row.id,
            chatbot_id: row.chatbot_id,
            organization_id: row.organization_id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

/// Embedding store over the pgvector-backed `documents_embeddings`
/// table. Chunk metadata is stored as JSONB; the dedup lookup keys on
/// the `chatbotId` and `hash` metadata fields.
#[derive(Clone)]
pub struct PgEmbeddingStore {
    pool: PgPool,
}

impl PgEmbeddingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmbeddingStore for PgEmbeddingStore {
    async fn exists_by_hash(&self, chatbot_id: Uuid, hash: &str) -> StoreResult<bool> {
        // Existence-only: no row payload leaves the database.
        let found: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT 1::bigint
            FROM documents_embeddings
            WHERE metadata->>'chatbotId' = $1
              AND metadata->>'hash' = $2
            LIMIT 1
            "#,
        )
        .bind(chatbot_id.to_string())
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(found.is_some())
    }

    async fn add_documents(&self, chunks: &[EmbeddedChunk]) -> StoreResult<()> {
        for chunk in chunks {
            let metadata = serde_json::to_value(&chunk.metadata)
                .map_err(StoreError::backend)?;

            sqlx::query(
                r#"
                INSERT INTO documents_embeddings (content, embedding, metadata)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&chunk.content)
            .bind(pgvector::Vector::from(chunk.embedding.clone()))
            .bind(metadata)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        }

        Ok(())
    }
}

#[derive(FromRow)]
struct ChatbotRow {
    id: Uuid,
    name: String,
    url: String,
    organization_id: i64,
}

/// Read-only chatbot lookup over the `chatbots` table.
#[derive(Clone)]
pub struct PgChatbotDirectory {
    pool: PgPool,
}

impl PgChatbotDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatbotDirectory for PgChatbotDirectory {
    async fn get_chatbot(&self, id: Uuid) -> StoreResult<Chatbot> {
        let row = sqlx::query_as::<_, ChatbotRow>(
            r#"
            SELECT id, name, url, organization_id
            FROM chatbots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .ok_or(StoreError::NotFound {
            entity: "chatbot",
            id: id.to_string(),
        })?;

        Ok(Chatbot {
            id: row.id,
            name: row.name,
            url: row.url,
            organization_id: row.organization_id,
        })
    }
}

/// Quota gate delegating to the `can_index_documents` SQL function,
/// which owns the plan and billing logic.
#[derive(Clone)]
pub struct PgQuotaGate {
    pool: PgPool,
}

impl PgQuotaGate {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaGate for PgQuotaGate {
    async fn can_index_documents(
        &self,
        organization_id: i64,
        requested: usize,
    ) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT can_index_documents($1, $2)")
            .bind(organization_id)
            .bind(requested as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
