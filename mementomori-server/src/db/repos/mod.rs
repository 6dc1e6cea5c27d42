//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Deletes use RETURNING, so "nothing deleted" is a NotFound, not a 500
//! - Constraint violations are mapped to Conflict / NotFound
//! - Transactions for multi-row writes

pub mod error;
pub mod users;
pub mod folders;
pub mod bubbles;
pub mod friends;
pub mod permissions;

pub use error::DbError;
pub use users::{UserRepo, User};
pub use folders::{FolderRepo, Folder, FolderListing};
pub use bubbles::{BubbleRepo, Bubble};
pub use friends::{FriendRepo, FriendRow, FriendPair, RemovedFriendPair, FriendWithPicture};
pub use permissions::{PermissionRepo, Permission};
