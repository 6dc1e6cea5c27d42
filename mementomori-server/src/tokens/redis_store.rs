//! Redis-backed token store
//!
//! `SET <key> <token> EX <ttl>` / `GET <key>` over one multiplexed
//! connection manager, which reconnects on its own.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{TokenStore, TokenStoreError};

const KEY_PREFIX: &str = "oauth_token:";

/// Token store backed by Redis
#[derive(Clone)]
pub struct RedisTokenStore {
    connection: ConnectionManager,
}

impl RedisTokenStore {
    /// Connect to `redis_url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(redis_url: &str) -> Result<Self, TokenStoreError> {
        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager().await?;
        tracing::info!("Connected to Redis token store");
        Ok(Self { connection })
    }

    fn key(email: &str) -> String {
        format!("{KEY_PREFIX}{email}")
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn store(&self, email: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError> {
        let mut conn = self.connection.clone();
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(Self::key(email), token, seconds).await?;
        Ok(())
    }

    async fn fetch(&self, email: &str) -> Result<Option<String>, TokenStoreError> {
        let mut conn = self.connection.clone();
        let token: Option<String> = conn.get(Self::key(email)).await?;
        Ok(token)
    }
}
