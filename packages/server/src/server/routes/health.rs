use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

/// Liveness check. Deliberately touches no backend: the crawl worker
/// must report healthy even while the database is briefly unavailable,
/// or the platform would restart it mid-crawl.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
