//! OAuth bearer-token cache
//!
//! One token per email with a fixed expiry. Redis backs it in production;
//! the in-memory store serves tests and Redis-less local runs.

pub mod memory;
pub mod redis_store;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryTokenStore;
pub use redis_store::RedisTokenStore;

/// Tokens expire seven days after they are stored.
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Token store error type
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Key-value store for OAuth tokens keyed by email.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store `token` for `email`, replacing any previous token.
    async fn store(&self, email: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError>;

    /// Fetch the live token for `email`, if any.
    async fn fetch(&self, email: &str) -> Result<Option<String>, TokenStoreError>;
}
