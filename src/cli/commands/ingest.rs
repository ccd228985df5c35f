use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::AppServices;

/// Handle the ingest command.
pub async fn execute(services: &AppServices, file: &Path, json: bool) -> Result<()> {
    let receipt = services
        .ingest
        .ingest(file)
        .await
        .context("Failed to process PDF upload")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!("Ingested {}", receipt.file_path);
    }

    Ok(())
}
