//! Document ingestion domain models

use serde::{Deserialize, Serialize};

/// Text extracted from a single document page.
///
/// Pages are 1-based and ordered as they appear in the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,

    /// Raw text content of the page
    pub text: String,
}

/// Metadata record stored alongside each indexed vector.
///
/// One record is persisted per row id, in insertion order. Records are
/// immutable once persisted; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Base filename of the source document (not a full path)
    pub source_file: String,

    /// 1-based page number the chunk was taken from
    pub page: u32,

    /// The chunk text
    pub text: String,

    /// Index of this chunk within its page (0-based)
    pub position: usize,
}

/// Result payload for a successful ingest operation.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    /// Always "ok" for a successful ingest
    pub status: String,

    /// Path of the ingested file
    pub file_path: String,
}

impl IngestReceipt {
    pub fn ok(file_path: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            file_path: file_path.into(),
        }
    }
}
