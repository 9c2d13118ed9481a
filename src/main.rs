use tracing_subscriber::EnvFilter;

use twitter_clone::{config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("twitter_clone=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting TwitterClone API in {:?} mode", config.environment);

    server::run(config).await
}
