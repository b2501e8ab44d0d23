//! Axum route handlers for the Jobs API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::analysis::pipeline::refresh_job_index;
use crate::errors::AppError;
use crate::ingest::jobs::{JobPosting, NewJob};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<JobPosting>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = state.job_store.list().await?;
    Ok(Json(JobListResponse {
        total: jobs.len(),
        jobs,
    }))
}

/// POST /api/v1/jobs
///
/// Stores the posting, then rebuilds the job index so search and trends see
/// it. A failed rebuild is logged; the posting stays stored and the previous
/// index keeps serving.
pub async fn handle_add_job(
    State(state): State<AppState>,
    Json(request): Json<NewJob>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let job = state.job_store.add(request).await?;

    if let Err(e) = refresh_job_index(&state).await {
        warn!("Job '{}' saved but index rebuild failed: {e}", job.id);
    }

    Ok((StatusCode::CREATED, Json(job)))
}
