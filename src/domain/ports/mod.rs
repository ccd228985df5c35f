//! Domain ports: trait seams between the pipeline and its collaborators

pub mod answerer;
pub mod embedding;
pub mod extractor;
pub mod vector_index;

pub use answerer::AnswerComposer;
pub use embedding::EmbeddingProvider;
pub use extractor::PageExtractor;
pub use vector_index::VectorIndex;
