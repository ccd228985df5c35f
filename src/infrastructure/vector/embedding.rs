//! Local embedding provider
//!
//! Generates deterministic, L2-normalized embeddings locally. This stands
//! in for a real sentence-transformer backend behind the same port: same
//! text always maps to the same vector, which is the only property the
//! pipeline and its tests rely on.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::ports::EmbeddingProvider;

/// Local deterministic embedding provider.
///
/// Constructed once at process start and shared by `Arc`, so any
/// model-load cost is paid a single time.
pub struct LocalEmbedder {
    dimension: usize,
}

impl LocalEmbedder {
    /// Create a provider producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Derive a unit-length vector from the text content.
    ///
    /// Byte content is mixed with the output position so that distinct
    /// texts land far apart while identical texts collide exactly.
    fn encode(&self, text: &str) -> Vec<f32> {
        let bytes = text.as_bytes();
        let mut vector = vec![0.0f32; self.dimension];

        for (i, val) in vector.iter_mut().enumerate() {
            let byte = if bytes.is_empty() {
                0
            } else {
                bytes[i % bytes.len()]
            };
            *val = ((byte as usize * 31 + i * 17) % 256) as f32 / 255.0 - 0.5;
        }

        // Normalize in f64 to avoid accumulation error over many
        // dimensions.
        let magnitude = vector
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt() as f32;

        if magnitude > 1e-10 {
            for val in &mut vector {
                *val /= magnitude;
            }
        } else {
            let uniform = 1.0 / (self.dimension as f32).sqrt();
            vector.fill(uniform);
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedder {
    fn name(&self) -> &'static str {
        "local"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.encode(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}
