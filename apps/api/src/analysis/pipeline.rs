//! Analysis pipeline: stored jobs → skills and trends → job index → evidence
//! retrieval → LLM gap analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::archive::save_report;
use crate::analysis::gap::{analyze_gap, GapAnalysis, GapAnalysisInput};
use crate::errors::AppError;
use crate::ingest::curriculum::build_course_chunks;
use crate::ingest::jobs::build_job_corpus;
use crate::ingest::store::load_curriculum;
use crate::ingest::text::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_WORDS};
use crate::retrieval::vector_index::{ScoredChunk, VectorIndex};
use crate::retrieval::Chunk;
use crate::skills::trends::{compute_trends, TrendReport};
use crate::state::AppState;

/// Shape of the job index after a rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub jobs_indexed: usize,
    pub chunks_indexed: usize,
    pub dimension: Option<usize>,
    pub model: String,
    pub extractor_backend: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexRefresh {
    pub stats: IndexStats,
    pub trends: TrendReport,
}

/// Everything the gap analysis needs, gathered without calling the LLM.
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub course_name: String,
    pub modules: Vec<Chunk>,
    pub evidence: Vec<ScoredChunk>,
    pub refresh: IndexRefresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub course_name: String,
    pub generated_at: DateTime<Utc>,
    pub gap_analysis: GapAnalysis,
    pub trends: TrendReport,
    pub evidence: Vec<ScoredChunk>,
    pub jobs_analyzed: usize,
    pub chunks_indexed: usize,
    pub extractor_backend: String,
}

/// Retrieval query used to pull market evidence for a course.
pub fn evidence_query(course_name: &str) -> String {
    format!("{course_name} skills requirements tools frameworks")
}

/// Rebuilds the job index from the job store and swaps it into shared state.
///
/// The new index is embedded outside the lock; readers keep the previous
/// index until the swap. A failed build leaves the previous index in place.
pub async fn refresh_job_index(state: &AppState) -> Result<IndexRefresh, AppError> {
    let jobs = state.job_store.list().await?;
    if jobs.is_empty() {
        return Err(AppError::Validation(
            "No job postings stored. Add jobs before building the index.".to_string(),
        ));
    }

    let corpus = build_job_corpus(
        &jobs,
        state.extractor.as_ref(),
        DEFAULT_CHUNK_WORDS,
        DEFAULT_CHUNK_OVERLAP,
    )
    .await?;

    let skill_sets: Vec<Vec<&String>> = corpus
        .skill_sets
        .iter()
        .map(|skills| skills.iter().collect())
        .collect();
    let trends = compute_trends(&skill_sets, state.config.trending_threshold)?;
    let jobs_indexed = corpus.job_count();

    let mut fresh = VectorIndex::new(state.embedder.clone());
    fresh.build_from_chunks(corpus.chunks).await?;

    let stats = IndexStats {
        jobs_indexed,
        chunks_indexed: fresh.len(),
        dimension: fresh.dimension(),
        model: fresh.model().to_string(),
        extractor_backend: state.extractor.backend(),
    };

    *state.job_index.write().await = fresh;

    info!(
        "Job index rebuilt: {} chunks from {} jobs, {} trending skills",
        stats.chunks_indexed,
        stats.jobs_indexed,
        trends.trending.len()
    );
    Ok(IndexRefresh { stats, trends })
}

/// Refreshes the index, loads the course modules and retrieves evidence.
pub async fn prepare_analysis(
    state: &AppState,
    course_name: &str,
) -> Result<PreparedAnalysis, AppError> {
    let course_name = course_name.trim();
    if course_name.is_empty() {
        return Err(AppError::Validation("course_name is required".to_string()));
    }

    let refresh = refresh_job_index(state).await?;

    let curriculum = load_curriculum(&state.config.curriculum_file).await?;
    let course = curriculum
        .course(course_name)
        .filter(|c| !c.modules.is_empty())
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No curriculum modules for course '{course_name}'. Known courses: {}",
                curriculum.course_names().join(", ")
            ))
        })?;
    let modules = build_course_chunks(course, state.extractor.as_ref()).await;

    let evidence = state
        .job_index
        .read()
        .await
        .retrieve(&evidence_query(course_name), state.config.top_k_job_chunks)
        .await?;

    Ok(PreparedAnalysis {
        course_name: course_name.to_string(),
        modules,
        evidence,
        refresh,
    })
}

/// Full analysis for one course. The report is also written to the analysis
/// output directory; a failed write is logged, not returned.
pub async fn run_analysis(state: &AppState, course_name: &str) -> Result<AnalysisReport, AppError> {
    let prepared = prepare_analysis(state, course_name).await?;
    let module_refs: Vec<&Chunk> = prepared.modules.iter().collect();
    let trends = prepared.refresh.trends;

    let gap_analysis = analyze_gap(
        &state.llm,
        &GapAnalysisInput {
            course_name: &prepared.course_name,
            evidence: &prepared.evidence,
            modules: &module_refs,
            trending: &trends.trending,
            frequency: &trends.frequency,
            total_jobs: trends.total_documents,
        },
    )
    .await?;

    let report = AnalysisReport {
        course_name: prepared.course_name,
        generated_at: Utc::now(),
        gap_analysis,
        jobs_analyzed: prepared.refresh.stats.jobs_indexed,
        chunks_indexed: prepared.refresh.stats.chunks_indexed,
        extractor_backend: prepared.refresh.stats.extractor_backend.to_string(),
        trends,
        evidence: prepared.evidence,
    };

    match save_report(&state.config.analysis_output_dir, &report).await {
        Ok(path) => info!("Saved analysis for '{}' to {}", report.course_name, path.display()),
        Err(e) => warn!("Analysis for '{}' not saved: {e}", report.course_name),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::jobs::JobChunkMetadata;
    use crate::state::test_support::{seed_files, test_state};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_refresh_builds_index_and_trends() {
        let dir = tempdir().unwrap();
        seed_files(dir.path());
        let state = test_state(dir.path());

        let refresh = refresh_job_index(&state).await.unwrap();
        assert_eq!(refresh.stats.jobs_indexed, 3);
        assert_eq!(refresh.stats.chunks_indexed, 3);
        assert_eq!(refresh.stats.dimension, Some(7));
        assert_eq!(refresh.stats.extractor_backend, "keyword");
        assert_eq!(refresh.trends.total_documents, 3);
        assert_eq!(refresh.trends.min_count, 2);
        assert_eq!(refresh.trends.trending, vec!["Docker", "Python"]);
        assert_eq!(refresh.trends.frequency["Python"], 2);

        assert!(state.job_index.read().await.is_built());
    }

    #[tokio::test]
    async fn test_refresh_without_jobs_is_validation_and_keeps_index_unbuilt() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        let err = refresh_job_index(&state).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!state.job_index.read().await.is_built());
    }

    #[tokio::test]
    async fn test_prepare_analysis_gathers_modules_and_evidence() {
        let dir = tempdir().unwrap();
        seed_files(dir.path());
        let state = test_state(dir.path());

        let prepared = prepare_analysis(&state, "  AI Engineer ").await.unwrap();
        assert_eq!(prepared.course_name, "AI Engineer");
        assert_eq!(prepared.modules.len(), 2);
        assert_eq!(
            prepared.modules[0].metadata["moduleSkills"],
            serde_json::json!(["Python", "SQL"])
        );
        assert_eq!(prepared.evidence.len(), 3);

        // query carries no vocabulary words, so the sparsest posting is nearest
        let nearest = JobChunkMetadata::from_metadata(&prepared.evidence[0].metadata).unwrap();
        assert_eq!(nearest.job_title, "Frontend Engineer");
        assert!(prepared
            .evidence
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
    }

    #[tokio::test]
    async fn test_unknown_or_empty_course_is_not_found() {
        let dir = tempdir().unwrap();
        seed_files(dir.path());
        let state = test_state(dir.path());

        for name in ["Data Scientist", "Empty Course", "ai engineer"] {
            let err = prepare_analysis(&state, name).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "{name}");
        }
    }

    #[tokio::test]
    async fn test_blank_course_name_is_validation() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        assert!(matches!(
            prepare_analysis(&state, "   ").await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_evidence_query() {
        assert_eq!(
            evidence_query("AI Engineer"),
            "AI Engineer skills requirements tools frameworks"
        );
    }
}
