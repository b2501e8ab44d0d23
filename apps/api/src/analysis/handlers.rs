//! Axum route handlers for the job index and curriculum analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::archive::load_report;
use crate::analysis::pipeline::{refresh_job_index, run_analysis, AnalysisReport, IndexRefresh};
use crate::errors::AppError;
use crate::retrieval::vector_index::ScoredChunk;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Falls back to TOP_K_JOB_CHUNKS.
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ScoredChunk>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub course_name: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/index/rebuild
pub async fn handle_rebuild_index(
    State(state): State<AppState>,
) -> Result<Json<IndexRefresh>, AppError> {
    Ok(Json(refresh_job_index(&state).await?))
}

/// POST /api/v1/index/search
///
/// Nearest job chunks for a free-text query. 409 until the index is built.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    let k = request.k.unwrap_or(state.config.top_k_job_chunks);

    let results = state.job_index.read().await.retrieve(&request.query, k).await?;

    Ok(Json(SearchResponse {
        query: request.query,
        results,
    }))
}

/// POST /api/v1/analysis
///
/// Rebuilds the job index from stored postings, then runs the gap analysis
/// for one course.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    Ok(Json(run_analysis(&state, &request.course_name).await?))
}

/// GET /api/v1/analysis/:course_name
///
/// Latest saved report for the course. 404 until an analysis has run.
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
    Path(course_name): Path<String>,
) -> Result<Json<AnalysisReport>, AppError> {
    load_report(&state.config.analysis_output_dir, &course_name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No saved analysis for course '{course_name}'")))
}
