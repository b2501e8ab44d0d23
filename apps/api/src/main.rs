mod analysis;
mod config;
mod errors;
mod ingest;
mod llm_client;
mod retrieval;
mod routes;
mod skills;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::refresh_job_index;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::retrieval::embedding::OpenAiEmbedder;
use crate::routes::build_router;
use crate::skills::extractor::build_extractor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Curriculum API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize embedding provider
    let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
    info!(
        "Embedding provider initialized (model: {}, batch size: {})",
        config.embedding.model, config.embedding.batch_size
    );

    // Initialize skill extractor (KeywordMatcher by default, swap via SKILL_EXTRACTOR)
    let extractor = build_extractor(config.skill_extractor, &llm)?;
    info!("Skill extractor: {}", extractor.backend());

    let state = AppState::new(config.clone(), llm, embedder, extractor);
    info!("Job store: {}", state.job_store.path().display());

    // Warm the job index; an empty or unreachable store only delays it to the first rebuild
    match refresh_job_index(&state).await {
        Ok(refresh) => info!(
            "Initial job index ready: {} chunks",
            refresh.stats.chunks_indexed
        ),
        Err(e) => warn!("Initial job index not built: {e}"),
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
