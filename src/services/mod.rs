//! Service layer: ingest and query orchestration over the domain ports

pub mod ingest;
pub mod query;

pub use ingest::IngestService;
pub use query::QueryService;
