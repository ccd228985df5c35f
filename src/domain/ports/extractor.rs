//! Page extraction port for source documents.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::PageText;

/// Trait for per-page text extraction from a source document.
///
/// Returned pages are ordered and 1-based. An unreadable or unparsable
/// document fails with [`DomainError::Extraction`].
///
/// [`DomainError::Extraction`]: crate::domain::errors::DomainError::Extraction
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Extract the text of every page in the document at `path`.
    async fn extract_pages(&self, path: &Path) -> DomainResult<Vec<PageText>>;
}
