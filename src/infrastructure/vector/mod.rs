//! Vector infrastructure components
//!
//! Implementations for text chunking, embedding generation, and the
//! flat file-backed vector index.

pub mod chunker;
pub mod embedding;
pub mod flat_index;

pub use chunker::Chunker;
pub use embedding::LocalEmbedder;
pub use flat_index::FlatIndex;
