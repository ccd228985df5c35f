//! Command handlers

pub mod ingest;
pub mod query;
pub mod stats;
