//! Domain models for the docquery pipeline

pub mod chunking;
pub mod config;
pub mod document;
pub mod query;

pub use chunking::ChunkingConfig;
pub use config::{Config, EmbeddingConfig, IndexConfig, LoggingConfig, RetrievalConfig};
pub use document::{ChunkRecord, IngestReceipt, PageText};
pub use query::{QueryAnswer, RetrievedContext, ScoredChunk};
