//! Ingest service
//!
//! Orchestrates the ingest flow: extract page text, chunk each page,
//! embed every chunk, and append the vectors with aligned metadata to
//! the index. The whole request is all-or-nothing: an embedding failure
//! anywhere in the batch persists nothing.

use std::path::Path;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ChunkRecord, IngestReceipt};
use crate::domain::ports::{EmbeddingProvider, PageExtractor, VectorIndex};
use crate::infrastructure::vector::Chunker;

/// Service for ingesting source documents into the vector index.
pub struct IngestService {
    extractor: Arc<dyn PageExtractor>,
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl IngestService {
    pub fn new(
        extractor: Arc<dyn PageExtractor>,
        chunker: Chunker,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            extractor,
            chunker,
            embedder,
            index,
        }
    }

    /// Ingest the document at `file_path`.
    ///
    /// The stored `source_file` is the file's base name, matching the
    /// filename-only comparison the query side performs.
    pub async fn ingest(&self, file_path: &Path) -> DomainResult<IngestReceipt> {
        if !tokio::fs::try_exists(file_path).await? {
            return Err(DomainError::Validation(format!(
                "file not found: {}",
                file_path.display()
            )));
        }

        let source_file = base_name(file_path)?;

        let pages = self.extractor.extract_pages(file_path).await?;

        let mut texts: Vec<String> = Vec::new();
        let mut records: Vec<ChunkRecord> = Vec::new();

        for page in &pages {
            // Pages with only whitespace carry nothing worth embedding;
            // a document made entirely of them counts as unextractable.
            if page.text.trim().is_empty() {
                continue;
            }

            for (position, chunk) in self.chunker.chunk(&page.text).into_iter().enumerate() {
                records.push(ChunkRecord {
                    source_file: source_file.clone(),
                    page: page.page,
                    text: chunk.clone(),
                    position,
                });
                texts.push(chunk);
            }
        }

        if records.is_empty() {
            return Err(DomainError::Extraction(format!(
                "no text extracted from {}",
                file_path.display()
            )));
        }

        tracing::info!(
            file = %source_file,
            pages = pages.len(),
            chunks = records.len(),
            "chunked document"
        );

        // Embed the whole batch before any write; a failure here leaves
        // the index untouched.
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed_batch(&refs).await?;

        self.index.upsert(vectors, records).await?;

        tracing::info!(file = %source_file, "indexed document");

        Ok(IngestReceipt::ok(file_path.display().to_string()))
    }
}

/// Base filename of a path, as a UTF-8 string.
pub(crate) fn base_name(path: &Path) -> DomainResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| {
            DomainError::Validation(format!("path has no usable filename: {}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::domain::models::{ChunkingConfig, PageText, ScoredChunk};
    use crate::infrastructure::vector::LocalEmbedder;

    /// Extractor stub returning canned pages.
    struct FixedExtractor {
        pages: Vec<PageText>,
    }

    #[async_trait]
    impl PageExtractor for FixedExtractor {
        async fn extract_pages(&self, _path: &Path) -> DomainResult<Vec<PageText>> {
            Ok(self.pages.clone())
        }
    }

    /// Index stub that records what gets upserted.
    #[derive(Default)]
    struct RecordingIndex {
        upserts: Mutex<Vec<(Vec<Vec<f32>>, Vec<ChunkRecord>)>>,
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        async fn upsert(
            &self,
            vectors: Vec<Vec<f32>>,
            records: Vec<ChunkRecord>,
        ) -> DomainResult<()> {
            self.upserts.lock().await.push((vectors, records));
            Ok(())
        }

        async fn search(&self, _query: &[f32], _top_k: usize) -> DomainResult<Vec<ScoredChunk>> {
            Ok(Vec::new())
        }

        async fn len(&self) -> DomainResult<usize> {
            Ok(0)
        }
    }

    /// Embedder stub that always fails.
    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> DomainResult<Vec<f32>> {
            Err(DomainError::Embedding("model unavailable".to_string()))
        }

        async fn embed_batch(&self, _texts: &[&str]) -> DomainResult<Vec<Vec<f32>>> {
            Err(DomainError::Embedding("model unavailable".to_string()))
        }
    }

    fn service_with(
        pages: Vec<PageText>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<RecordingIndex>,
    ) -> IngestService {
        IngestService::new(
            Arc::new(FixedExtractor { pages }),
            Chunker::new(ChunkingConfig::default()).unwrap(),
            embedder,
            index,
        )
    }

    async fn touch(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, b"pdf bytes").await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_file_is_validation_error() {
        let index = Arc::new(RecordingIndex::default());
        let service = service_with(vec![], Arc::new(LocalEmbedder::new(8)), index);

        let err = service
            .ingest(Path::new("/nonexistent/doc.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_extractable_text_aborts_without_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "empty.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![PageText {
                page: 1,
                text: String::new(),
            }],
            Arc::new(LocalEmbedder::new(8)),
            index.clone(),
        );

        let err = service.ingest(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::Extraction(_)));
        assert!(index.upserts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_only_pages_abort_without_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "blank.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![
                PageText {
                    page: 1,
                    text: "\n \n \t ".to_string(),
                },
                PageText {
                    page: 2,
                    text: "   ".to_string(),
                },
            ],
            Arc::new(LocalEmbedder::new(8)),
            index.clone(),
        );

        let err = service.ingest(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::Extraction(_)));
        assert!(index.upserts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_pages_skipped_but_real_pages_indexed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "mixed.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![
                PageText {
                    page: 1,
                    text: " \n\t".to_string(),
                },
                PageText {
                    page: 2,
                    text: "actual content".to_string(),
                },
            ],
            Arc::new(LocalEmbedder::new(8)),
            index.clone(),
        );

        service.ingest(&path).await.unwrap();

        let upserts = index.upserts.lock().await;
        let (_, records) = &upserts[0];
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page, 2);
        assert_eq!(records[0].text, "actual content");
    }

    #[tokio::test]
    async fn test_single_page_3000_chars_yields_three_aligned_chunks() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "doc.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![PageText {
                page: 1,
                text: "a".repeat(3000),
            }],
            Arc::new(LocalEmbedder::new(8)),
            index.clone(),
        );

        let receipt = service.ingest(&path).await.unwrap();
        assert_eq!(receipt.status, "ok");

        let upserts = index.upserts.lock().await;
        assert_eq!(upserts.len(), 1);
        let (vectors, records) = &upserts[0];
        assert_eq!(vectors.len(), 3);
        assert_eq!(records.len(), 3);
        for (position, record) in records.iter().enumerate() {
            assert_eq!(record.page, 1);
            assert_eq!(record.position, position);
            assert_eq!(record.source_file, "doc.pdf");
        }
        assert_eq!(records[0].text.len(), 1500);
        assert_eq!(records[2].text.len(), 400);
    }

    #[tokio::test]
    async fn test_chunk_positions_reset_per_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "doc.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![
                PageText {
                    page: 1,
                    text: "x".repeat(1600),
                },
                PageText {
                    page: 2,
                    text: "short".to_string(),
                },
            ],
            Arc::new(LocalEmbedder::new(8)),
            index.clone(),
        );

        service.ingest(&path).await.unwrap();

        let upserts = index.upserts.lock().await;
        let (_, records) = &upserts[0];
        assert_eq!(records.len(), 3);
        assert_eq!((records[0].page, records[0].position), (1, 0));
        assert_eq!((records[1].page, records[1].position), (1, 1));
        assert_eq!((records[2].page, records[2].position), (2, 0));
    }

    #[tokio::test]
    async fn test_embedding_failure_discards_everything() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = touch(&dir, "doc.pdf").await;

        let index = Arc::new(RecordingIndex::default());
        let service = service_with(
            vec![PageText {
                page: 1,
                text: "some content".to_string(),
            }],
            Arc::new(FailingEmbedder),
            index.clone(),
        );

        let err = service.ingest(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::Embedding(_)));
        assert!(index.upserts.lock().await.is_empty());
    }
}
