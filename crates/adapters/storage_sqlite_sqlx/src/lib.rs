//! # backsync-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter built on [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the model port for arbitrary tables: schema discovery,
//!   row load/insert/update/delete, filtered collection queries
//! - Manage the connection pool and run migrations
//!
//! ## Dependency rule
//! Depends on `backsync-app` (port traits) and `backsync-domain`
//! (vocabulary). Never imports HTTP or other adapter crates.

pub mod error;
pub mod pool;
pub mod resource;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use resource::{SqliteModel, SqliteResource};
