//! CLI layer: argument parsing, command dispatch, and error reporting

pub mod commands;
pub mod types;

pub use types::{Cli, Commands};

use std::sync::Arc;

use anyhow::Result;

use crate::domain::models::Config;
use crate::domain::ports::{AnswerComposer, EmbeddingProvider, PageExtractor, VectorIndex};
use crate::infrastructure::answer::NaiveComposer;
use crate::infrastructure::extract::PdfExtractor;
use crate::infrastructure::vector::{Chunker, FlatIndex, LocalEmbedder};
use crate::services::{IngestService, QueryService};

/// Shared wiring for the command handlers.
///
/// Built once per invocation: the embedding provider and the index
/// handle exist exactly once, so the per-path upsert serialization in
/// [`FlatIndex`] actually applies.
pub struct AppServices {
    pub ingest: IngestService,
    pub query: QueryService,
    pub index: Arc<dyn VectorIndex>,
}

/// Construct the service graph from configuration.
pub fn build_services(config: &Config, top_k_override: Option<usize>) -> Result<AppServices> {
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(LocalEmbedder::new(config.embedding.dimension));
    let extractor: Arc<dyn PageExtractor> = Arc::new(PdfExtractor::new());
    let composer: Arc<dyn AnswerComposer> = Arc::new(NaiveComposer::new());
    let index: Arc<FlatIndex> = Arc::new(FlatIndex::new(config.index.path.clone()));

    let chunker = Chunker::new(config.chunking.clone())?;
    let top_k = top_k_override.unwrap_or(config.retrieval.top_k);

    Ok(AppServices {
        ingest: IngestService::new(
            extractor,
            chunker,
            embedder.clone(),
            index.clone() as Arc<dyn VectorIndex>,
        ),
        query: QueryService::new(
            embedder,
            index.clone() as Arc<dyn VectorIndex>,
            composer,
            top_k,
        ),
        index: index as Arc<dyn VectorIndex>,
    })
}

/// Report a failed command and exit non-zero.
///
/// Every failure surfaces as a structured payload: a generic top-level
/// message plus the full cause chain as details. Diagnostics also go to
/// the log at full verbosity.
pub fn handle_error(err: &anyhow::Error, json: bool) -> ! {
    tracing::error!(error = ?err, "command failed");

    if json {
        let payload = serde_json::json!({
            "error": err.to_string(),
            "details": format!("{err:#}"),
        });
        println!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }

    std::process::exit(1);
}
