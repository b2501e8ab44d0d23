use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::skills::extractor::ExtractorKind;
use crate::skills::trends::DEFAULT_TRENDING_THRESHOLD;

/// Options for the embedding provider. Passed into constructors explicitly.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    /// Embedding model id. Index build and queries always share it.
    pub model: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Max texts per embedding request.
    pub batch_size: usize,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub embedding: EmbeddingConfig,
    pub jobs_file: PathBuf,
    pub curriculum_file: PathBuf,
    /// Where the latest report per course is written as `gap_analysis_<course>.json`.
    pub analysis_output_dir: PathBuf,
    pub top_k_job_chunks: usize,
    pub trending_threshold: f64,
    pub skill_extractor: ExtractorKind,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let trending_threshold: f64 =
            parse_env("SKILL_TRENDING_THRESHOLD", DEFAULT_TRENDING_THRESHOLD)?;
        anyhow::ensure!(
            trending_threshold > 0.0 && trending_threshold <= 1.0,
            "SKILL_TRENDING_THRESHOLD must be in (0, 1], got {trending_threshold}"
        );

        let skill_extractor = std::env::var("SKILL_EXTRACTOR")
            .unwrap_or_else(|_| "keyword".to_string())
            .parse::<ExtractorKind>()
            .map_err(anyhow::Error::msg)?;

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding: EmbeddingConfig {
                api_key: require_env("EMBEDDING_API_KEY")?,
                base_url: std::env::var("EMBEDDING_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: std::env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
                timeout_ms: parse_env("EMBEDDING_TIMEOUT_MS", 30_000)?,
                batch_size: parse_env("EMBEDDING_BATCH_SIZE", 64)?,
            },
            jobs_file: std::env::var("JOBS_FILE")
                .unwrap_or_else(|_| "data/jobs.json".to_string())
                .into(),
            curriculum_file: std::env::var("CURRICULUM_FILE")
                .unwrap_or_else(|_| "data/curriculum.json".to_string())
                .into(),
            analysis_output_dir: std::env::var("ANALYSIS_OUTPUT_DIR")
                .unwrap_or_else(|_| "data/analysis".to_string())
                .into(),
            top_k_job_chunks: parse_env("TOP_K_JOB_CHUNKS", 10)?,
            trending_threshold,
            skill_extractor,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
