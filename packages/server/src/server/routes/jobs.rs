use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    Json,
};
use lead_discovery::{Job, Lead};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::error::ApiError;

const APPROVE_BATCH: &str = "approve_batch";

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    approved_results: Vec<Lead>,
}

#[derive(Debug, Deserialize)]
pub struct JobQuery {
    #[serde(rename = "jobId")]
    job_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: String,
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Job,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text())))
}

fn require_job_id(job_id: Option<String>) -> Result<String, ApiError> {
    job_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("jobId is required".to_string()))
}

/// Submit a prompt. The job runs in the background; poll `GET /jobs`.
pub async fn create_job_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<Json<CreateJobResponse>, ApiError> {
    let prompt = json_body(payload)?
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prompt is required".to_string()))?;

    let job = state.server_deps.orchestrator.submit(&prompt).await;
    tracing::info!(job_id = %job.id, "Lead job submitted");

    Ok(Json(CreateJobResponse {
        job_id: job.id.clone(),
        job,
    }))
}

pub async fn get_job_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobResponse>, ApiError> {
    let job_id = require_job_id(query.job_id)?;
    let job = state.server_deps.registry.get(&job_id).await?;
    Ok(Json(JobResponse { job }))
}

/// Apply a reviewer action. Only `approve_batch` exists.
pub async fn update_job_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let request = json_body(payload)?;
    let job_id = require_job_id(request.job_id)?;

    // Unknown jobs are reported before unknown actions
    state.server_deps.registry.get(&job_id).await?;

    if request.action.as_deref() != Some(APPROVE_BATCH) {
        return Err(ApiError::BadRequest("Invalid action".to_string()));
    }

    let job = state
        .server_deps
        .registry
        .approve_batch(&job_id, request.approved_results)
        .await?;
    Ok(Json(JobResponse { job }))
}

/// Cancel a job waiting for review.
pub async fn cancel_job_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobResponse>, ApiError> {
    let job_id = require_job_id(query.job_id)?;
    let job = state.server_deps.registry.cancel(&job_id).await?;
    Ok(Json(JobResponse { job }))
}
