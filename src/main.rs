use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewdesk_api::cli::{self, Cli};
use reviewdesk_api::config::{self, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SUPABASE_URL, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();
    let default_filter = match config.environment {
        Environment::Development => "info,reviewdesk_api=debug",
        Environment::Staging | Environment::Production => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!("Starting reviewdesk-api in {:?} mode", config.environment);

    if let Err(e) = cli::run(Cli::parse(), config).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
