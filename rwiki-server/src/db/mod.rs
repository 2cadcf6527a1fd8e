//! Database layer - SQLite pool, schema and repositories
//!
//! # Design Principles
//!
//! - One sqlx SqlitePool shared through AppState, no ad-hoc connections
//! - Every status write goes through the [`crate::models::Status`] enum
//! - Negative results (not found, at boundary) are outcomes, not errors
//! - Reorder swaps run inside a single transaction

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;
