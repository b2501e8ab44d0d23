//! Exact nearest-neighbour index over embedded text chunks.
//!
//! Vectors, texts and metadata are stored in parallel, order-preserving
//! vectors. Queries scan every stored vector (squared Euclidean distance);
//! there is no approximation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::retrieval::embedding::{EmbeddingError, EmbeddingProvider};
use crate::retrieval::{Chunk, Metadata, RetrievalError};

/// A stored chunk returned by `retrieve`, with its distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub metadata: Metadata,
    /// Squared Euclidean distance to the query embedding.
    pub distance: f32,
}

/// Everything produced by one successful `build`. Replaced wholesale on rebuild.
#[derive(Debug)]
struct Corpus {
    texts: Vec<String>,
    metadata: Vec<Metadata>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

pub struct VectorIndex {
    provider: Arc<dyn EmbeddingProvider>,
    corpus: Option<Corpus>,
}

impl VectorIndex {
    /// Creates an empty, unbuilt index. Build and query embeddings both go
    /// through `provider`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            corpus: None,
        }
    }

    /// Embeds `texts` in a single provider call and replaces the current corpus.
    ///
    /// On any failure the previous corpus (or the unbuilt state) is kept.
    pub async fn build(
        &mut self,
        texts: Vec<String>,
        metadata: Vec<Metadata>,
    ) -> Result<(), RetrievalError> {
        if texts.is_empty() {
            return Err(RetrievalError::InvalidArgument(
                "cannot build an index from zero texts".to_string(),
            ));
        }
        if texts.len() != metadata.len() {
            return Err(RetrievalError::InvalidArgument(format!(
                "{} texts but {} metadata entries",
                texts.len(),
                metadata.len()
            )));
        }

        let vectors = self.provider.embed_batch(&texts).await?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Shape(format!(
                "provider returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            ))
            .into());
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(EmbeddingError::Shape("provider returned empty vectors".to_string()).into());
        }
        if let Some(pos) = vectors.iter().position(|v| v.len() != dimension) {
            return Err(EmbeddingError::Shape(format!(
                "vector {} has dimension {}, expected {}",
                pos,
                vectors[pos].len(),
                dimension
            ))
            .into());
        }

        info!(
            "Built vector index: {} chunks, dimension {}, model {}",
            texts.len(),
            dimension,
            self.provider.model()
        );

        self.corpus = Some(Corpus {
            texts,
            metadata,
            vectors,
            dimension,
        });
        Ok(())
    }

    /// Convenience over `build` for pre-assembled chunks.
    pub async fn build_from_chunks(&mut self, chunks: Vec<Chunk>) -> Result<(), RetrievalError> {
        let (texts, metadata): (Vec<String>, Vec<Metadata>) =
            chunks.into_iter().map(|c| (c.text, c.metadata)).unzip();
        self.build(texts, metadata).await
    }

    /// Returns the `min(k, len)` stored chunks closest to `query`, nearest first.
    ///
    /// Ties keep insertion order.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let corpus = self.corpus.as_ref().ok_or(RetrievalError::NotBuilt)?;

        let k = k.min(corpus.texts.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut embedded = self.provider.embed_batch(&[query.to_string()]).await?;
        if embedded.len() != 1 {
            return Err(EmbeddingError::Shape(format!(
                "provider returned {} vectors for a single query",
                embedded.len()
            ))
            .into());
        }
        let query_vector = embedded.remove(0);
        if query_vector.len() != corpus.dimension {
            return Err(EmbeddingError::Shape(format!(
                "query dimension {} does not match index dimension {}",
                query_vector.len(),
                corpus.dimension
            ))
            .into());
        }

        let hits = nearest(&corpus.vectors, &query_vector, k);
        debug!("Retrieved {} of {} chunks", hits.len(), corpus.texts.len());

        Ok(hits
            .into_iter()
            .map(|(pos, distance)| ScoredChunk {
                text: corpus.texts[pos].clone(),
                metadata: corpus.metadata[pos].clone(),
                distance,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.corpus.as_ref().map(|c| c.texts.len()).unwrap_or(0)
    }

    pub fn is_built(&self) -> bool {
        self.corpus.is_some()
    }

    /// Vector dimensionality of the current corpus, if built.
    pub fn dimension(&self) -> Option<usize> {
        self.corpus.as_ref().map(|c| c.dimension)
    }

    /// Embedding model the index embeds with.
    pub fn model(&self) -> &str {
        self.provider.model()
    }
}

pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Exhaustive scan: positions and distances of the `k` nearest vectors.
fn nearest(vectors: &[Vec<f32>], query: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(pos, v)| (pos, squared_euclidean(v, query)))
        .collect();

    // sort_by is stable, so equal distances stay in insertion order
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic provider backed by a lookup table; unknown texts map to the origin.
    struct TableEmbedder {
        table: HashMap<String, Vec<f32>>,
        dimension: usize,
        calls: AtomicUsize,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            let dimension = entries.first().map(|(_, v)| v.len()).unwrap_or(2);
            Self {
                table: entries
                    .iter()
                    .map(|(t, v)| (t.to_string(), v.clone()))
                    .collect(),
                dimension,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for TableEmbedder {
        fn model(&self) -> &str {
            "table"
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    self.table
                        .get(t)
                        .cloned()
                        .unwrap_or_else(|| vec![0.0; self.dimension])
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn model(&self) -> &str {
            "failing"
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    /// Drops the last vector of every batch.
    struct ShortEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ShortEmbedder {
        fn model(&self) -> &str {
            "short"
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0, 1.0]).collect())
        }
    }

    fn meta(title: &str) -> Metadata {
        let mut m = Metadata::new();
        m.insert("jobTitle".to_string(), json!(title));
        m
    }

    fn four_chunk_provider() -> Arc<TableEmbedder> {
        Arc::new(TableEmbedder::new(&[
            ("chunk a", vec![0.0, 0.0]),
            ("chunk b", vec![1.0, 0.0]),
            ("chunk c", vec![5.0, 5.0]),
            ("chunk d", vec![0.0, 2.0]),
            ("X", vec![0.9, 0.1]),
        ]))
    }

    async fn built_index(provider: Arc<TableEmbedder>) -> VectorIndex {
        let mut index = VectorIndex::new(provider);
        index
            .build(
                vec![
                    "chunk a".to_string(),
                    "chunk b".to_string(),
                    "chunk c".to_string(),
                    "chunk d".to_string(),
                ],
                vec![meta("A"), meta("B"), meta("C"), meta("D")],
            )
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_retrieve_returns_k_nearest_in_ascending_order() {
        let index = built_index(four_chunk_provider()).await;

        let hits = index.retrieve("X", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "chunk b");
        assert_eq!(hits[0].metadata["jobTitle"], "B");
        assert_eq!(hits[1].text, "chunk a");
        assert_eq!(hits[1].metadata["jobTitle"], "A");
        assert!(hits[0].distance <= hits[1].distance);
        assert_ne!(hits[0].text, hits[1].text);
    }

    #[tokio::test]
    async fn test_oversized_k_is_clamped_to_corpus_size() {
        let index = built_index(four_chunk_provider()).await;

        let hits = index.retrieve("X", 50).await.unwrap();
        assert_eq!(hits.len(), 4);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[tokio::test]
    async fn test_k_zero_returns_empty() {
        let index = built_index(four_chunk_provider()).await;
        assert!(index.retrieve("X", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_before_build_is_not_built() {
        let index = VectorIndex::new(four_chunk_provider());
        let err = index.retrieve("X", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NotBuilt));
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let provider = Arc::new(TableEmbedder::new(&[
            ("left", vec![-1.0, 0.0]),
            ("right", vec![1.0, 0.0]),
            ("up", vec![0.0, 1.0]),
            ("origin", vec![0.0, 0.0]),
        ]));
        let mut index = VectorIndex::new(provider);
        index
            .build(
                vec!["left".into(), "right".into(), "up".into()],
                vec![meta("L"), meta("R"), meta("U")],
            )
            .await
            .unwrap();

        let hits = index.retrieve("origin", 3).await.unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right", "up"]);
        assert!(hits.iter().all(|h| (h.distance - 1.0).abs() < f32::EPSILON));
    }

    #[tokio::test]
    async fn test_build_calls_provider_once_for_whole_batch() {
        let provider = four_chunk_provider();
        let _index = built_index(provider.clone()).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_previous_corpus() {
        let provider = four_chunk_provider();
        let mut index = built_index(provider).await;
        assert_eq!(index.len(), 4);

        index
            .build(vec!["chunk c".to_string()], vec![meta("C")])
            .await
            .unwrap();
        assert_eq!(index.len(), 1);

        let hits = index.retrieve("X", 4).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "chunk c");
    }

    #[tokio::test]
    async fn test_identical_builds_give_identical_results() {
        let provider = four_chunk_provider();
        let first = built_index(provider.clone()).await.retrieve("X", 3).await.unwrap();
        let second = built_index(provider).await.retrieve("X", 3).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_mismatched_lengths_rejected() {
        let mut index = VectorIndex::new(four_chunk_provider());
        let err = index
            .build(vec!["chunk a".to_string()], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidArgument(_)));
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn test_empty_build_rejected() {
        let mut index = VectorIndex::new(four_chunk_provider());
        let err = index.build(vec![], vec![]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_index_unbuilt() {
        let mut index = VectorIndex::new(Arc::new(FailingEmbedder));
        let err = index
            .build(vec!["a".to_string()], vec![meta("A")])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(EmbeddingError::Api { .. })));
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn test_count_mismatch_is_embedding_error() {
        let mut index = VectorIndex::new(Arc::new(ShortEmbedder));
        let err = index
            .build(
                vec!["a".to_string(), "b".to_string()],
                vec![meta("A"), meta("B")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(EmbeddingError::Shape(_))));
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn test_build_from_chunks_preserves_order() {
        let mut index = VectorIndex::new(four_chunk_provider());
        index
            .build_from_chunks(vec![
                Chunk::new("chunk d", meta("D")),
                Chunk::new("chunk a", meta("A")),
            ])
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimension(), Some(2));

        let hits = index.retrieve("chunk d", 1).await.unwrap();
        assert_eq!(hits[0].metadata["jobTitle"], "D");
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn test_squared_euclidean() {
        assert_eq!(squared_euclidean(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_euclidean(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }
}
