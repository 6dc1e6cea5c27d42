//! HTTP server command
//!
//! Connects PostgreSQL and the token store, applies the schema, and serves
//! the API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use mementomori_server::db::{create_pool_with_options, migrate, DEFAULT_MAX_CONNECTIONS};
use mementomori_server::http::server::DEFAULT_BODY_LIMIT;
use mementomori_server::http::{run_server, AppState, ServerConfig};
use mementomori_server::tokens::{MemoryTokenStore, RedisTokenStore, TokenStore};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Redis URL for the OAuth token cache (in-memory cache when unset)
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Maximum database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Allow permissive CORS (all origins) - needed for clients on a device
    #[arg(long)]
    pub cors_permissive: bool,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Do not create missing tables on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let pool = create_pool_with_options(&database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::debug!("Skipping schema migration");
    } else {
        migrate(&pool).await.context("Migration failed")?;
    }

    let tokens: Arc<dyn TokenStore> = match args.redis_url {
        Some(url) => Arc::new(
            RedisTokenStore::connect(&url)
                .await
                .context("Failed to connect to Redis")?,
        ),
        None => {
            tracing::warn!("REDIS_URL not set; OAuth tokens are kept in memory and lost on restart");
            Arc::new(MemoryTokenStore::new())
        }
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        body_limit: args.body_limit,
    };

    tracing::info!("Starting mementomori server on {}", config.bind_addr);

    run_server(AppState::new(pool, tokens), config)
        .await
        .context("Server error")?;

    Ok(())
}
