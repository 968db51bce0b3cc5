use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;

pub async fn handle(output: OutputFormat) -> anyhow::Result<()> {
    match DatabaseManager::health_check().await {
        Ok(()) => {
            match output {
                OutputFormat::Json => {
                    println!("{}", json!({ "status": "ok", "database": "ok" }))
                }
                OutputFormat::Text => println!("Database: ok"),
            }
            Ok(())
        }
        Err(e) => {
            match output {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "status": "degraded", "database_error": e.to_string() })
                ),
                OutputFormat::Text => println!("Database: unavailable ({e})"),
            }
            anyhow::bail!("database health check failed")
        }
    }
}
