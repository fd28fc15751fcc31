//! Application setup and router wiring.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use ingestion::pipeline::PipelineDeps;

use crate::chatbots::SiteNameCache;
use crate::server::routes::{
    create_job_handler, execute_task_handler, get_job_handler, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: PipelineDeps,
    pub site_names: Arc<SiteNameCache>,
}

impl AppState {
    pub fn new(deps: PipelineDeps) -> Self {
        Self {
            deps,
            site_names: Arc::new(SiteNameCache::new()),
        }
    }
}

/// Build the Axum application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/jobs", post(create_job_handler))
        .route("/api/jobs/:id", get(get_job_handler))
        .route("/api/tasks/execute", post(execute_task_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
