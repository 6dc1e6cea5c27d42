//! mementomori-server: photo-sharing HTTP API
//!
//! Users keep photo "bubbles" in folders, befriend each other, and share
//! folders through permission grants. PostgreSQL holds the data; an OAuth
//! token cache sits beside it in Redis.

pub mod db;
pub mod http;
pub mod models;
pub mod tokens;

pub use db::{create_pool, create_pool_with_options, migrate, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use tokens::{MemoryTokenStore, RedisTokenStore, TokenStore, TokenStoreError, TOKEN_TTL};
