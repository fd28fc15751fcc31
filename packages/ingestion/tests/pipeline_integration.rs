//! End-to-end pipeline tests over the in-memory store and mocks.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use ingestion::pipeline::{create_job, execute_task, PipelineDeps, MAX_LINKS_PER_JOB};
use ingestion::stores::MemoryStore;
use ingestion::testing::{MockCrawler, MockDirectory, MockEmbedder, MockQuotaGate, MockQueue};
use ingestion::traits::JobStore;
use ingestion::types::{Chatbot, CrawlFilters, JobStatus, TaskPayload};
use ingestion::JobCreationError;

const SITE: &str = "https://example.com";

fn page_html(body: &str) -> String {
    format!("<html><head><title>Page</title></head><body><main><h1>Page</h1><p>{body}</p></main></body></html>")
}

fn chatbot() -> Chatbot {
    Chatbot {
        id: Uuid::new_v4(),
        name: "Example".into(),
        url: SITE.into(),
        organization_id: 7,
    }
}

struct Harness {
    deps: PipelineDeps,
    store: MemoryStore,
    queue: Arc<MockQueue>,
    chatbot: Chatbot,
}

fn harness(crawler: MockCrawler, chatbot: Chatbot, quota: MockQuotaGate) -> Harness {
    let store = MemoryStore::new();
    let queue = Arc::new(MockQueue::new());
    let deps = PipelineDeps {
        crawler: Arc::new(crawler),
        directory: Arc::new(MockDirectory::new().with_chatbot(chatbot.clone())),
        quota: Arc::new(quota),
        jobs: Arc::new(store.clone()),
        documents: Arc::new(store.clone()),
        embeddings: Arc::new(store.clone()),
        embedder: Arc::new(MockEmbedder::new()),
        queue: queue.clone(),
        chunk_size: 1500,
    };

    Harness {
        deps,
        store,
        queue,
        chatbot,
    }
}

#[tokio::test(start_paused = true)]
async fn test_create_job_slices_links_with_staggered_delays() {
    let links: Vec<String> = (0..45).map(|i| format!("{SITE}/page-{i}")).collect();
    let crawler = MockCrawler::new().with_sitemap(SITE, links.clone());
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    let returned = create_job(&h.deps, h.chatbot.id, &CrawlFilters::none())
        .await
        .unwrap();
    assert_eq!(returned.id, h.chatbot.id);

    // 45 links fit in two tasks of at most MAX_LINKS_PER_JOB.
    let published = h.queue.published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].0.links.len(), MAX_LINKS_PER_JOB);
    assert_eq!(published[1].0.links.len(), 45 - MAX_LINKS_PER_JOB);
    assert_eq!(published[0].1.delay, Duration::from_millis(0));
    assert_eq!(published[1].1.delay, Duration::from_millis(500));

    // Both tasks advance the same job, counted in links.
    let job_id = published[0].0.job_id;
    assert_eq!(published[1].0.job_id, job_id);
    let job = h.store.get_job(job_id).await.unwrap();
    assert_eq!(job.tasks_count, 45);
    assert_eq!(job.status, JobStatus::Running);
}

#[tokio::test]
async fn test_create_job_applies_filters_before_slicing() {
    let links = vec![
        format!("{SITE}/docs/a"),
        format!("{SITE}/pricing"),
        format!("{SITE}/docs/b"),
    ];
    let crawler = MockCrawler::new().with_sitemap(SITE, links);
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    let filters = CrawlFilters {
        allow: vec!["/docs".into()],
        disallow: vec![],
    };
    create_job(&h.deps, h.chatbot.id, &filters).await.unwrap();

    let published = h.queue.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].0.links,
        vec![format!("{SITE}/docs/a"), format!("{SITE}/docs/b")]
    );
}

#[tokio::test]
async fn test_quota_denial_leaves_no_job_behind() {
    let crawler = MockCrawler::new().with_sitemap(SITE, vec![format!("{SITE}/page")]);
    let h = harness(crawler, chatbot(), MockQuotaGate::denying());

    let err = create_job(&h.deps, h.chatbot.id, &CrawlFilters::none()).await;
    assert!(matches!(err, Err(JobCreationError::QuotaExceeded { .. })));

    assert_eq!(h.store.job_count(), 0);
    assert!(h.queue.published().is_empty());
}

#[tokio::test]
async fn test_empty_link_list_is_rejected() {
    let crawler = MockCrawler::new().with_sitemap(SITE, vec![]);
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    let err = create_job(&h.deps, h.chatbot.id, &CrawlFilters::none()).await;
    assert!(matches!(err, Err(JobCreationError::NoLinksFound)));
    assert_eq!(h.store.job_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_execute_task_contains_per_link_failures() {
    let urls: Vec<String> = (0..3).map(|i| format!("{SITE}/page-{i}")).collect();
    let crawler = MockCrawler::new()
        .with_sitemap(SITE, urls.clone())
        .with_page(&urls[0], page_html("First page body."))
        .with_failure(&urls[1])
        .with_page(&urls[2], page_html("Third page body."));
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    create_job(&h.deps, h.chatbot.id, &CrawlFilters::none())
        .await
        .unwrap();
    let (task, _) = h.queue.published().remove(0);

    let report = execute_task(&h.deps, &task).await.unwrap();

    // The failed link still counts as processed, just not succeeded.
    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(h.store.document_count(), 2);
    assert!(h.store.chunk_count() >= 2);

    // All three links were assigned to one task, so the job is done.
    assert_eq!(report.job.tasks_completed_count, 3);
    assert_eq!(report.job.tasks_succeeded_count, 2);
    assert_eq!(report.job.status, JobStatus::Completed);
    assert!(report.job.completed_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_content_is_indexed_once() {
    // Two URLs serving byte-identical pages.
    let urls = vec![format!("{SITE}/a"), format!("{SITE}/b")];
    let html = page_html("Shared body text.");
    let crawler = MockCrawler::new()
        .with_sitemap(SITE, urls.clone())
        .with_page(&urls[0], html.clone())
        .with_page(&urls[1], html);
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    create_job(&h.deps, h.chatbot.id, &CrawlFilters::none())
        .await
        .unwrap();
    let (task, _) = h.queue.published().remove(0);

    // Run sequentially so the second ingest sees the first's hash.
    let first = TaskPayload {
        links: vec![urls[0].clone()],
        ..task.clone()
    };
    let second = TaskPayload {
        links: vec![urls[1].clone()],
        ..task
    };

    let report = execute_task(&h.deps, &first).await.unwrap();
    assert_eq!(report.succeeded, 1);

    let report = execute_task(&h.deps, &second).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.succeeded, 0);

    assert_eq!(h.store.document_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rerunning_a_task_is_idempotent_for_content() {
    let url = format!("{SITE}/page");
    let crawler = MockCrawler::new()
        .with_sitemap(SITE, vec![url.clone()])
        .with_page(&url, page_html("Stable body."));
    let h = harness(crawler, chatbot(), MockQuotaGate::allowing());

    create_job(&h.deps, h.chatbot.id, &CrawlFilters::none())
        .await
        .unwrap();
    let (task, _) = h.queue.published().remove(0);

    execute_task(&h.deps, &task).await.unwrap();
    let chunks_after_first = h.store.chunk_count();
    execute_task(&h.deps, &task).await.unwrap();

    // Redelivery crawls again but indexes nothing new.
    assert_eq!(h.store.document_count(), 1);
    assert_eq!(h.store.chunk_count(), chunks_after_first);
}
