use anyhow::Context;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::{manager::DatabaseManager, schema};

pub async fn handle(output: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool()
        .await
        .context("failed to connect to database")?;
    schema::apply(&pool).await.context("failed to apply schema")?;

    match output {
        OutputFormat::Json => println!("{}", json!({ "status": "ok", "schema": "applied" })),
        OutputFormat::Text => println!("Schema applied"),
    }
    Ok(())
}
