//! PDF page extraction over lopdf

use std::path::Path;

use async_trait::async_trait;
use lopdf::Document;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PageText;
use crate::domain::ports::PageExtractor;

/// Extracts per-page text from PDF documents.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parsing is CPU-bound, so it runs on the blocking pool.
    fn extract_blocking(path: &Path) -> DomainResult<Vec<PageText>> {
        let document = Document::load(path).map_err(|e| {
            DomainError::Extraction(format!("failed to load {}: {e}", path.display()))
        })?;

        let mut pages = Vec::new();
        for (page_number, _) in document.get_pages() {
            let text = document.extract_text(&[page_number]).map_err(|e| {
                DomainError::Extraction(format!(
                    "failed to extract text from page {page_number}: {e}"
                ))
            })?;
            pages.push(PageText {
                page: page_number,
                text,
            });
        }

        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageExtractor for PdfExtractor {
    async fn extract_pages(&self, path: &Path) -> DomainResult<Vec<PageText>> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| DomainError::Extraction(format!("extraction task failed: {e}")))?
    }
}
