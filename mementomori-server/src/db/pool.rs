//! PostgreSQL pool shared by every request handler
//!
//! Friend add/remove hold a pooled connection for a whole transaction, so
//! the pool needs headroom beyond one connection per in-flight request.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Default maximum connections (`DATABASE_MAX_CONNECTIONS` overrides).
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/mementomori").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
