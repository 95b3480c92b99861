use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    jobs: JobsHealth,
}

#[derive(Serialize)]
pub struct JobsHealth {
    total: usize,
    /// Jobs not yet completed or failed
    active: usize,
}

/// Health check endpoint
///
/// The registry lives in memory, so the service is healthy whenever it
/// answers.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let registry = &state.server_deps.registry;

    Json(HealthResponse {
        status: "healthy".to_string(),
        jobs: JobsHealth {
            total: registry.len().await,
            active: registry.active_count().await,
        },
    })
}
