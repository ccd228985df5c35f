//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for embedding providers.
///
/// Implementations must be deterministic for identical input within a
/// process lifetime: the same text always yields the same vector. A
/// provider is constructed once at startup (model loading is paid once)
/// and shared by `Arc` into the services that need it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "local", "openai").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model. All vectors stored
    /// in one index must share this dimension.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// Output order matches input order. Any failure aborts the whole
    /// batch; callers rely on this for all-or-nothing ingest semantics.
    async fn embed_batch(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>>;
}
