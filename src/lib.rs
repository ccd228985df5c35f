//! Docquery - PDF question answering over a flat vector index
//!
//! Docquery ingests PDF documents, splits page text into overlapping
//! chunks, embeds each chunk, and stores the vectors in a persistent
//! flat L2 index with an aligned metadata store. At query time it embeds
//! the question, retrieves the nearest chunks, deduplicates them by
//! page, and assembles an answer with the supporting page list.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): models, ports, and errors
//! - **Service Layer** (`services`): ingest and query orchestration
//! - **Infrastructure Layer** (`infrastructure`): chunker, embedder,
//!   flat index, PDF extraction, answer composition, configuration
//! - **CLI Layer** (`cli`): command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ChunkRecord, ChunkingConfig, Config, IngestReceipt, PageText, QueryAnswer, RetrievedContext,
    ScoredChunk,
};
pub use domain::ports::{AnswerComposer, EmbeddingProvider, PageExtractor, VectorIndex};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{Chunker, FlatIndex, LocalEmbedder};
pub use services::{IngestService, QueryService};
