pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::ingest::handlers as jobs;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_add_job),
        )
        // Skills API
        .route("/api/v1/skills/extract", post(skills::handle_extract_skills))
        .route("/api/v1/trends", post(skills::handle_trends))
        // Index & analysis API
        .route("/api/v1/index/rebuild", post(analysis::handle_rebuild_index))
        .route("/api/v1/index/search", post(analysis::handle_search))
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .route(
            "/api/v1/analysis/:course_name",
            get(analysis::handle_latest_analysis),
        )
        .with_state(state)
}
