//! Text chunking domain models
//!
//! Configuration for splitting page text into overlapping
//! fixed-size windows before embedding.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Overlap between consecutive chunks in characters
    /// (preserves context across chunk boundaries)
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

const fn default_max_chars() -> usize {
    1500
}

const fn default_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkingConfig {
    /// Validate the chunking configuration.
    ///
    /// The advance step is `max_chars - overlap`; an overlap at or above
    /// `max_chars` would make it non-positive and the chunker would never
    /// terminate, so it is rejected here.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars == 0 {
            return Err("max_chars must be greater than 0".to_string());
        }

        if self.overlap >= self.max_chars {
            return Err(format!(
                "overlap ({}) must be less than max_chars ({})",
                self.overlap, self.max_chars
            ));
        }

        Ok(())
    }
}
