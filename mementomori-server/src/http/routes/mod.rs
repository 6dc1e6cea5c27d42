//! Route handlers organized by resource

pub mod health;
pub mod users;
pub mod checks;
pub mod folders;
pub mod bubbles;
pub mod friends;
pub mod permissions;
pub mod auth;

