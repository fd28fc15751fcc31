//! Task execution endpoint - the queue's delivery target.
//!
//! The queue redelivers a task whenever this endpoint answers with a
//! non-2xx status, so the response code is the retry protocol:
//! - 403: signature invalid; the delivery is not ours, drop it
//! - 500 {"success":false}: execution failed, please redeliver
//! - 200 {"success":true}: done (or retry budget exhausted - at that
//!   point redelivering cannot help, so we absorb the failure)

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ingestion::pipeline::execute_task;
use ingestion::types::TaskPayload;

use crate::server::app::AppState;

/// Redeliveries requested before a task is abandoned.
pub const MAX_RETRIES: u32 = 3;

const SIGNATURE_HEADER: &str = "upstash-signature";
const RETRIES_HEADER: &str = "upstash-retries";

#[derive(Serialize)]
struct TaskResponse {
    success: bool,
}

fn task_response(status: StatusCode, success: bool) -> Response {
    (status, Json(TaskResponse { success })).into_response()
}

/// POST /api/tasks/execute - handle one task delivery from the queue.
pub async fn execute_task_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Authenticate before touching the body or any backend.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(e) = state.deps.queue.verify(&body, signature) {
        tracing::warn!(error = %e, "Rejected task delivery");
        return (StatusCode::FORBIDDEN, "invalid signature").into_response();
    }

    let task: TaskPayload = match serde_json::from_slice(&body) {
        Ok(task) => task,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed task payload");
            return (StatusCode::BAD_REQUEST, "malformed payload").into_response();
        }
    };

    if task.links.is_empty() || task.links.iter().any(|l| url::Url::parse(l).is_err()) {
        tracing::warn!(job_id = task.job_id, "Task payload contains invalid links");
        return (StatusCode::BAD_REQUEST, "invalid links").into_response();
    }

    let retries = headers
        .get(RETRIES_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);

    match execute_task(&state.deps, &task).await {
        Ok(report) => {
            tracing::info!(
                job_id = task.job_id,
                processed = report.processed,
                succeeded = report.succeeded,
                job_status = %report.job.status,
                "Task executed"
            );
            task_response(StatusCode::OK, true)
        }
        Err(e) if retries < MAX_RETRIES => {
            tracing::error!(job_id = task.job_id, retries, error = %e, "Task failed, requesting redelivery");
            task_response(StatusCode::INTERNAL_SERVER_ERROR, false)
        }
        Err(e) => {
            // Out of retries. Answer 200 so the queue stops; the links
            // in this task stay unprocessed and the job counters will
            // never reach tasks_count.
            tracing::error!(
                job_id = task.job_id,
                chatbot_id = %task.chatbot_id,
                retries,
                gave_up = true,
                error = %e,
                "Task abandoned after exhausting retries"
            );
            task_response(StatusCode::OK, true)
        }
    }
}
