//! Sliding-window text chunker
//!
//! Splits page text into overlapping fixed-size character windows
//! before embedding.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ChunkingConfig;

/// Character-window chunker.
///
/// Starting at offset 0, emits `text[offset..offset + max_chars]` and
/// advances by `max_chars - overlap` until the offset passes the end of
/// the text. Non-empty text always yields at least one chunk, even when
/// shorter than `max_chars`; empty text yields none.
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker, validating the configuration.
    ///
    /// Rejects `overlap >= max_chars`, which would make the advance step
    /// non-positive.
    pub fn new(config: ChunkingConfig) -> DomainResult<Self> {
        config
            .validate()
            .map_err(|e| DomainError::Validation(format!("invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    /// Split `text` into overlapping windows.
    ///
    /// Offsets are measured in characters, not bytes, so multi-byte
    /// UTF-8 input never splits inside a code point.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary, plus the end sentinel.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let total_chars = boundaries.len() - 1;

        let step = self.config.max_chars - self.config.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total_chars {
            let end = (start + self.config.max_chars).min(total_chars);
            chunks.push(text[boundaries[start]..boundaries[end]].to_string());
            start += step;
        }

        chunks
    }

    /// The configuration this chunker was built with.
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}
