//! Job creation and lookup endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ingestion::error::{JobCreationError, StoreError};
use ingestion::pipeline::create_job;
use ingestion::types::{Chatbot, CrawlFilters, Job};

use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub chatbot_id: Uuid,

    #[serde(default)]
    pub filters: CrawlFilters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub chatbot: Chatbot,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// POST /api/jobs - start a crawl for a chatbot's website.
pub async fn create_job_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Response {
    match create_job(&state.deps, request.chatbot_id, &request.filters).await {
        Ok(chatbot) => {
            state.site_names.insert(chatbot.id, chatbot.name.clone());
            (StatusCode::OK, Json(CreateJobResponse { chatbot })).into_response()
        }
        Err(e) => job_creation_error_response(e),
    }
}

fn job_creation_error_response(error: JobCreationError) -> Response {
    match &error {
        JobCreationError::QuotaExceeded { .. } => {
            error_response(StatusCode::CONFLICT, error.to_string())
        }
        JobCreationError::NoLinksFound => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        JobCreationError::Crawl(_) => error_response(StatusCode::BAD_GATEWAY, error.to_string()),
        JobCreationError::Store(StoreError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        JobCreationError::Store(_) | JobCreationError::Queue(_) => {
            tracing::error!(error = %error, "Job creation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    #[serde(flatten)]
    pub job: Job,

    /// Cached display name of the site being crawled, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// GET /api/jobs/:id - job progress for dashboard polling.
pub async fn get_job_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.deps.jobs.get_job(id).await {
        Ok(job) => {
            let site_name = state.site_names.get(job.chatbot_id);
            (StatusCode::OK, Json(JobResponse { job, site_name })).into_response()
        }
        Err(StoreError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, format!("job {id} not found"))
        }
        Err(e) => {
            tracing::error!(job_id = id, error = %e, "Job lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
