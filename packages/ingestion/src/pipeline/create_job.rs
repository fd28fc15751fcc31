//! Job creation: sitemap discovery, quota gate, task fan-out.

use tracing::{error, info};
use uuid::Uuid;

use crate::batch::parallelize_batch;
use crate::crawler::filter_links;
use crate::error::JobCreationError;
use crate::types::{Chatbot, CrawlFilters, EnqueueOptions, NewJob, TaskPayload};

use super::{
    PipelineDeps, DELAY_BETWEEN_JOBS, DELAY_BETWEEN_TASKS, ENQUEUE_CONCURRENCY, MAX_LINKS_PER_JOB,
};

/// Create a crawl job for a chatbot's website and enqueue its tasks.
///
/// Discovers links from the site's sitemap, applies the crawl filters,
/// checks the organization's quota, inserts one job row covering every
/// link, and publishes one queue task per slice of at most
/// [`MAX_LINKS_PER_JOB`] links. Task i is published with a delivery
/// delay of i x [`DELAY_BETWEEN_JOBS`], and publishes themselves run in
/// batches of [`ENQUEUE_CONCURRENCY`] separated by
/// [`DELAY_BETWEEN_TASKS`].
///
/// Returns the chatbot record. No job row exists on error.
pub async fn create_job(
    deps: &PipelineDeps,
    chatbot_id: Uuid,
    filters: &CrawlFilters,
) -> Result<Chatbot, JobCreationError> {
    info!(chatbot_id = %chatbot_id, "Creating chatbot crawling job");

    let chatbot = deps.directory.get_chatbot(chatbot_id).await?;
    let sites = deps.crawler.sitemap_links(&chatbot.url).await?;
    let links = filter_links(&sites, filters);

    // Verify the organization is under quota before creating anything.
    let can_create = deps
        .quota
        .can_index_documents(chatbot.organization_id, links.len())
        .await?;

    if !can_create {
        return Err(JobCreationError::QuotaExceeded {
            organization_id: chatbot.organization_id,
            requested: links.len(),
        });
    }

    if links.is_empty() {
        info!(
            chatbot_id = %chatbot_id,
            organization_id = chatbot.organization_id,
            "No links found. Skipping job creation"
        );
        return Err(JobCreationError::NoLinksFound);
    }

    let slices: Vec<&[String]> = links.chunks(MAX_LINKS_PER_JOB).collect();

    info!(
        chatbot_id = %chatbot_id,
        organization_id = chatbot.organization_id,
        number_of_links = links.len(),
        number_of_tasks = slices.len(),
        "Fetched sitemap links. Inserting job"
    );

    let job = deps
        .jobs
        .insert_job(&NewJob {
            chatbot_id,
            organization_id: chatbot.organization_id,
            tasks_count: links.len() as i64,
        })
        .await?;

    info!(chatbot_id = %chatbot_id, job_id = job.id, "Created job record, enqueueing tasks");

    let publishes = slices
        .iter()
        .enumerate()
        .map(|(index, slice)| {
            let payload = TaskPayload {
                chatbot_id,
                job_id: job.id,
                links: slice.to_vec(),
            };
            let options = EnqueueOptions::with_delay(DELAY_BETWEEN_JOBS * index as u32);
            let queue = deps.queue.clone();

            async move {
                match queue.enqueue(&payload, options).await {
                    Ok(enqueued) => Some(enqueued),
                    Err(e) => {
                        error!(job_id = payload.job_id, error = %e, "Failed to publish task");
                        None
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    let results = parallelize_batch(publishes, ENQUEUE_CONCURRENCY, DELAY_BETWEEN_TASKS).await;
    let started = results.iter().filter(|r| r.is_some()).count();

    info!(
        chatbot_id = %chatbot_id,
        job_id = job.id,
        number_of_tasks = results.len(),
        number_of_tasks_started = started,
        "Finalized job creation"
    );

    Ok(chatbot)
}
