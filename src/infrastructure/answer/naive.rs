//! Naive answer composition
//!
//! Placeholder for a real inference backend: concatenates the retrieved
//! context texts into a fixed template. Only the [`AnswerComposer`]
//! contract is load-bearing; nothing here attempts to be smart.

use crate::domain::models::RetrievedContext;
use crate::domain::ports::AnswerComposer;

/// Character budget for the concatenated context snippet.
const SNIPPET_BUDGET: usize = 500;

/// Concatenating answer composer.
pub struct NaiveComposer;

impl NaiveComposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NaiveComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerComposer for NaiveComposer {
    fn compose(&self, _question: &str, contexts: &[RetrievedContext]) -> (String, Vec<u32>) {
        let joined = contexts
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        // Truncate on char boundaries, not bytes.
        let snippet: String = joined.chars().take(SNIPPET_BUDGET).collect();
        let answer = format!("Based on the document context: {snippet}...");

        let pages = contexts.iter().map(|c| c.page).collect();
        (answer, pages)
    }
}
