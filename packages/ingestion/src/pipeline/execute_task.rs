//! Task execution: crawl a slice of links and index the results.

use tracing::{info, warn};

use crate::batch::parallelize_batch;
use crate::dedup::content_hash;
use crate::error::TaskError;
use crate::parser::Parser;
use crate::splitter::TextSplitter;
use crate::types::{ChunkMetadata, EmbeddedChunk, Job, NewDocument, TaskPayload};

use super::{PipelineDeps, DELAY_BETWEEN_LINKS, LINK_CONCURRENCY};

/// Outcome of one task execution. Every attempted link counts toward
/// `processed`; only links that produced a newly indexed document count
/// toward `succeeded` (duplicates and failures do not).
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Links attempted, regardless of outcome
    pub processed: usize,

    /// Links that produced a new document
    pub succeeded: usize,

    /// Job row after the counter update
    pub job: Job,
}

/// Execute one queue task: crawl each assigned link, index new content,
/// and advance the job counters.
///
/// Per-link failures (fetch, parse, duplicate content, indexing) are
/// contained to their unit and logged; they still advance `processed`.
/// Only job bookkeeping failures escape as [`TaskError`], because they
/// are the only case where queue redelivery can help.
pub async fn execute_task(deps: &PipelineDeps, task: &TaskPayload) -> Result<TaskReport, TaskError> {
    let job = deps
        .jobs
        .get_job(task.job_id)
        .await
        .map_err(TaskError::JobLookup)?;

    info!(
        job_id = task.job_id,
        chatbot_id = %task.chatbot_id,
        links = task.links.len(),
        "Crawling links"
    );

    let units = task
        .links
        .iter()
        .map(|url| process_link(deps, task, &job, url))
        .collect::<Vec<_>>();

    let outcomes = parallelize_batch(units, LINK_CONCURRENCY, DELAY_BETWEEN_LINKS).await;

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    let processed = outcomes.len();

    info!(
        job_id = task.job_id,
        successful_tasks = succeeded,
        errored_tasks = processed - succeeded,
        "Crawling links done. Updating job"
    );

    let job = deps
        .jobs
        .add_progress(task.job_id, processed as i64, succeeded as i64)
        .await
        .map_err(TaskError::JobUpdate)?;

    Ok(TaskReport {
        processed,
        succeeded,
        job,
    })
}

/// Process a single link end to end. Resolves to `true` only when a new
/// document was indexed; all errors are caught here so that sibling
/// units in the batch are never aborted.
async fn process_link(deps: &PipelineDeps, task: &TaskPayload, job: &Job, url: &str) -> bool {
    let page = match fetch_page(deps, url).await {
        Ok(page) => page,
        Err(reason) => {
            warn!(url, job_id = task.job_id, error = %reason, "Error crawling URL");
            return false;
        }
    };

    let hash = content_hash(&page.content);

    // Skip content this chatbot has already indexed.
    match deps.embeddings.exists_by_hash(task.chatbot_id, &hash).await {
        Ok(true) => {
            info!(url, job_id = task.job_id, "Content already indexed, skipping");
            return false;
        }
        Ok(false) => {}
        Err(e) => {
            warn!(url, job_id = task.job_id, error = %e, "Dedup lookup failed");
            return false;
        }
    }

    let document = match deps
        .documents
        .insert_document(&NewDocument {
            chatbot_id: task.chatbot_id,
            organization_id: job.organization_id,
            title: page.title.clone(),
            content: page.content.clone(),
        })
        .await
    {
        Ok(document) => document,
        Err(e) => {
            warn!(url, job_id = task.job_id, error = %e, "Failed to insert document");
            return false;
        }
    };

    let splitter = TextSplitter::new(deps.chunk_size);
    let chunks = splitter.split(&page.content);

    info!(
        url,
        job_id = task.job_id,
        document_id = document.id,
        chunks = chunks.len(),
        "Splitting and indexing document"
    );

    let mut rows = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let embedding = match deps.embedder.embed(&chunk).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(url, job_id = task.job_id, error = %e, "Embedding failed");
                return false;
            }
        };

        rows.push(EmbeddedChunk {
            content: chunk,
            embedding,
            metadata: ChunkMetadata {
                title: page.title.clone(),
                hash: hash.clone(),
                url: url.to_string(),
                organization_id: job.organization_id,
                chatbot_id: task.chatbot_id,
                document_id: document.id,
            },
        });
    }

    if let Err(e) = deps.embeddings.add_documents(&rows).await {
        warn!(url, job_id = task.job_id, error = %e, "Failed to index embeddings");
        return false;
    }

    info!(url, job_id = task.job_id, document_id = document.id, "Document indexed");
    true
}

/// Fetch and extract one page, collapsing crawl and parse failures into
/// a printable reason.
async fn fetch_page(deps: &PipelineDeps, url: &str) -> Result<crate::types::ParsedPage, String> {
    let origin = origin_of(url).map_err(|e| e.to_string())?;
    let html = deps.crawler.crawl(url).await.map_err(|e| e.to_string())?;

    Parser::new()
        .parse(&html, &origin)
        .map_err(|e| e.to_string())
}

/// Scheme-and-host of a URL, used to absolutize relative links.
fn origin_of(url: &str) -> Result<String, url::ParseError> {
    let parsed = url::Url::parse(url)?;
    Ok(parsed.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://example.com/docs/intro?x=1").unwrap(),
            "https://example.com"
        );
        assert!(origin_of("not a url").is_err());
    }
}
