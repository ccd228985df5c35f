use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::AppServices;

/// Handle the query command.
pub async fn execute(
    services: &AppServices,
    question: &str,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let answer = services
        .query
        .query(question, file)
        .await
        .context("Failed to process query")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", answer.answer);
        if answer.pages.is_empty() {
            println!("\nNo supporting pages found.");
        } else {
            let pages = answer
                .pages
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("\nSupporting pages: {pages}");
        }
    }

    Ok(())
}
