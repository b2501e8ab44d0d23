use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::ingest::store::JobStore;
use crate::llm_client::LlmClient;
use crate::retrieval::embedding::EmbeddingProvider;
use crate::retrieval::vector_index::VectorIndex;
use crate::skills::extractor::SkillExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Embedding backend shared by every index built in this process.
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Pluggable extractor. Default: KeywordMatcher. Swap via SKILL_EXTRACTOR env.
    pub extractor: Arc<dyn SkillExtractor>,
    pub job_store: Arc<JobStore>,
    /// Job-chunk index. Many readers; rebuilds swap in a fresh index under the write lock.
    pub job_index: Arc<RwLock<VectorIndex>>,
}

impl AppState {
    pub fn new(
        config: Config,
        llm: LlmClient,
        embedder: Arc<dyn EmbeddingProvider>,
        extractor: Arc<dyn SkillExtractor>,
    ) -> Self {
        let job_store = Arc::new(JobStore::new(config.jobs_file.clone()));
        let job_index = Arc::new(RwLock::new(VectorIndex::new(embedder.clone())));
        Self {
            llm,
            config,
            embedder,
            extractor,
            job_store,
            job_index,
        }
    }
}
