//! Domain errors for the docquery pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-level errors that can occur while ingesting or querying documents.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector/metadata count mismatch: {vectors} vectors, {records} records")]
    Alignment { vectors: usize, records: usize },

    #[error("Embedding dimension mismatch: index holds {expected}-dimensional vectors, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("No index found at {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Corrupt index at {}: {detail}", .path.display())]
    CorruptIndex { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
