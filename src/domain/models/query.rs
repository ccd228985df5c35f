//! Query-side domain models

use serde::Serialize;

use crate::domain::models::ChunkRecord;

/// A single nearest-neighbor hit with its resolved metadata.
///
/// Produced transiently per query, never persisted.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Insertion-order index of the vector within the store
    pub row_id: usize,

    /// Squared Euclidean distance to the query vector
    pub distance: f32,

    /// The metadata record aligned with `row_id`
    pub record: ChunkRecord,
}

/// A deduplicated, file-filtered context handed to answer assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedContext {
    /// 1-based page number
    pub page: u32,

    /// Chunk text supporting the answer
    pub text: String,
}

/// Result payload for a successful query operation.
#[derive(Debug, Clone, Serialize)]
pub struct QueryAnswer {
    /// Assembled answer text
    pub answer: String,

    /// Pages supporting the answer, nearest-first, already deduplicated
    pub pages: Vec<u32>,
}
