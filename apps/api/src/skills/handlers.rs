//! Axum route handlers for skill extraction and trends.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills::extractor::SkillSet;
use crate::skills::trends::{compute_trends, TrendReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: SkillSet,
    pub backend: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct TrendsRequest {
    pub skill_sets: Vec<Vec<String>>,
    /// Falls back to SKILL_TRENDING_THRESHOLD.
    pub threshold: Option<f64>,
}

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let skills = state.extractor.extract(&request.text).await;
    Ok(Json(ExtractResponse {
        skills,
        backend: state.extractor.backend(),
    }))
}

/// POST /api/v1/trends
///
/// Frequency table and trending set for caller-supplied skill sets, one per document.
pub async fn handle_trends(
    State(state): State<AppState>,
    Json(request): Json<TrendsRequest>,
) -> Result<Json<TrendReport>, AppError> {
    let threshold = request
        .threshold
        .unwrap_or(state.config.trending_threshold);
    Ok(Json(compute_trends(&request.skill_sets, threshold)?))
}
