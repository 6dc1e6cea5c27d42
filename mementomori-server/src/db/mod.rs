//! Database layer - connection pool, schema, and repositories
//!
//! - Connection pool, no Arc<Mutex<Connection>>
//! - Constraints decide conflicts; repos translate violations into DbError
//! - Transactions for the two-row friendship writes

pub mod pool;
pub mod schema;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use schema::migrate;
pub use repos::*;
