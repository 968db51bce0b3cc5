#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = inkwell_api::config::config();
    tracing::info!("Starting Inkwell API in {:?} mode", config.environment);

    // Allow tests or deployments to override the configured port via env
    let port = std::env::var("INKWELL_API_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    if let Err(e) = inkwell_api::server::serve(port).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
