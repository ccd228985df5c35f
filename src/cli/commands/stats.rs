use anyhow::{Context, Result};

use crate::cli::AppServices;
use crate::domain::models::Config;

/// Handle the stats command.
pub async fn execute(services: &AppServices, config: &Config, json: bool) -> Result<()> {
    let vectors = services
        .index
        .len()
        .await
        .context("Failed to read index statistics")?;

    if json {
        let payload = serde_json::json!({
            "index_path": config.index.path,
            "vectors": vectors,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Index:   {}", config.index.path);
        println!("Vectors: {vectors}");
    }

    Ok(())
}
