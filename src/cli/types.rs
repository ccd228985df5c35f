//! CLI type definitions
//!
//! Clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "PDF question answering over a flat vector index", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Path to a config file (defaults to .docquery/config.yaml plus
    /// DOCQUERY_* environment overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a PDF document into the vector index
    Ingest {
        /// Path to the PDF file
        file: PathBuf,
    },

    /// Ask a question against the indexed documents
    Query {
        /// The question to answer (positional argument)
        question: String,

        /// Restrict results to one source document; only the base
        /// filename is compared
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Number of nearest neighbors to retrieve (over-fetch relative
        /// to the distinct pages wanted)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show vector index statistics
    Stats,
}
