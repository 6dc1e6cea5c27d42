//! In-process token store

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{TokenStore, TokenStoreError};

/// Token store held in process memory. Entries expire lazily on read.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, email: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError> {
        let expires_at = Instant::now() + ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, at)| *at > Instant::now());
        entries.insert(email.to_owned(), (token.to_owned(), expires_at));
        Ok(())
    }

    async fn fetch(&self, email: &str) -> Result<Option<String>, TokenStoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(email)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(token, _)| token.clone()))
    }
}
