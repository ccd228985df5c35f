//! Vector index port: durable, append-only nearest-neighbor storage.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ChunkRecord, ScoredChunk};

/// Trait for a similarity-searchable vector store with an aligned
/// metadata store.
///
/// Row ids are dense, gapless 0-based insertion order, and map 1:1 to
/// metadata records. The flat-file exact-L2 implementation can be
/// replaced by a database- or service-backed one without touching the
/// retrieval pipeline.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Append vectors and their metadata records, in order, then persist.
    ///
    /// Preconditions: `vectors.len() == records.len()` (else
    /// `Alignment`), and every vector matches the index's established
    /// dimension (else `DimensionMismatch`). Nothing is written when a
    /// precondition fails. Calls against the same index are serialized
    /// by the implementation.
    async fn upsert(&self, vectors: Vec<Vec<f32>>, records: Vec<ChunkRecord>) -> DomainResult<()>;

    /// Return up to `top_k` rows nearest to `query` by squared
    /// Euclidean distance, ascending, ties broken by ascending row id.
    ///
    /// Fails with `IndexNotFound` when no index has been persisted yet.
    async fn search(&self, query: &[f32], top_k: usize) -> DomainResult<Vec<ScoredChunk>>;

    /// Number of vectors currently persisted (0 for an absent index).
    async fn len(&self) -> DomainResult<usize>;
}
