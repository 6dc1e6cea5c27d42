//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use mementomori_server::db::{create_pool, migrate};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create any missing tables and indexes, then exit.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrate(&pool).await.context("Migration failed")?;

    tracing::info!("Schema is up to date");
    Ok(())
}
