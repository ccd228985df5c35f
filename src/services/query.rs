//! Query service
//!
//! The retrieval pipeline: embed the question, run nearest-neighbor
//! search, optionally restrict hits to one source file, deduplicate by
//! page, and hand the surviving contexts to the answer composer.

use std::path::Path;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{QueryAnswer, RetrievedContext};
use crate::domain::ports::{AnswerComposer, EmbeddingProvider, VectorIndex};
use crate::services::ingest::base_name;

/// Service answering questions against the vector index.
pub struct QueryService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    composer: Arc<dyn AnswerComposer>,
    top_k: usize,
}

impl QueryService {
    /// Create a query service.
    ///
    /// `top_k` is the number of neighbors requested per search. It
    /// over-fetches relative to the distinct pages a caller wants back,
    /// since several chunks can map to the same page.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        composer: Arc<dyn AnswerComposer>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            composer,
            top_k,
        }
    }

    /// Retrieve deduplicated, optionally file-scoped contexts for a
    /// question.
    ///
    /// Hits come back nearest-first; filtering and page deduplication
    /// never reorder the survivors.
    pub async fn retrieve(
        &self,
        question: &str,
        source_file: Option<&Path>,
    ) -> DomainResult<Vec<RetrievedContext>> {
        if question.trim().is_empty() {
            return Err(DomainError::Validation("question is empty".to_string()));
        }

        // Filter on the base filename only, never the full path.
        let filter = source_file.map(base_name).transpose()?;

        let query_vector = self.embedder.embed(question).await?;
        let hits = self.index.search(&query_vector, self.top_k).await?;

        tracing::debug!(hits = hits.len(), "nearest-neighbor search complete");

        let mut contexts = Vec::new();
        let mut seen_pages = Vec::new();

        for hit in hits {
            if let Some(ref wanted) = filter {
                if hit.record.source_file != *wanted {
                    continue;
                }
            }

            if seen_pages.contains(&hit.record.page) {
                continue;
            }
            seen_pages.push(hit.record.page);

            contexts.push(RetrievedContext {
                page: hit.record.page,
                text: hit.record.text,
            });
        }

        Ok(contexts)
    }

    /// Answer a question: retrieve contexts and compose the reply.
    pub async fn query(
        &self,
        question: &str,
        source_file: Option<&Path>,
    ) -> DomainResult<QueryAnswer> {
        let contexts = self.retrieve(question, source_file).await?;
        let (answer, pages) = self.composer.compose(question, &contexts);

        Ok(QueryAnswer { answer, pages })
    }
}
