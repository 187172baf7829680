use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::auth::{Identity, JwtVerifier};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::server;

#[derive(Parser)]
#[command(name = "reviewdesk-api")]
#[command(about = "Review collection API for real-estate agents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,

    #[command(about = "Issue a development bearer token signed with SUPABASE_JWT_SECRET")]
    Token {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
        hours: i64,
    },
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let mut config = config.clone();
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = server::build_state(&config).await?;
            server::serve(&config, state).await
        }
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            pool.close().await;
            Ok(())
        }
        Commands::Token {
            user_id,
            email,
            name,
            hours,
        } => {
            let secret = config
                .auth
                .jwt_secret
                .as_deref()
                .context("SUPABASE_JWT_SECRET must be set to issue tokens")?;
            let issuer = JwtVerifier::new(secret, config.auth.jwt_audience.clone());
            let identity = Identity::new(user_id, Some(email), name);
            let token = issuer.issue(&identity, chrono::Duration::hours(hours))?;
            println!("{}", token);
            Ok(())
        }
    }
}
