// Retrieval core: embedding provider seam and the exact vector index.
// Index state is process-lifetime only; a new corpus means a full rebuild.

pub mod embedding;
pub mod vector_index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retrieval::embedding::EmbeddingError;

/// Structured metadata attached to a chunk: string keys, scalar or list values.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A bounded span of source text plus its metadata; the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Vector index has not been built")]
    NotBuilt,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}
