//! Answer composition port.

use crate::domain::models::RetrievedContext;

/// Trait for turning retrieved contexts into an answer.
///
/// The naive in-tree implementation concatenates context text; a real
/// inference backend can be swapped in behind this trait. Implementations
/// must accept zero contexts and must not reorder or deduplicate the
/// returned pages beyond what the retrieval pipeline already produced.
pub trait AnswerComposer: Send + Sync {
    /// Compose an answer and the list of supporting pages.
    ///
    /// `pages` holds the context page numbers in the same order as
    /// `contexts`.
    fn compose(&self, question: &str, contexts: &[RetrievedContext]) -> (String, Vec<u32>);
}
