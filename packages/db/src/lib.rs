//! SurrealDB integration for the city portal.
//!
//! This crate provides database connectivity and repositories for
//! queue status snapshots and user appointments.
//!
//! # Features
//!
//! - `rocksdb`: RocksDB engine behind `DbConfig::file` endpoints
//!
//! In-memory storage is always available.

mod connection;
mod query;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, get_db, init_db};
pub use query::{Direction, RowQuery};
pub use schema::init_schema;

/// Initialize the database with the given configuration.
///
/// This should be called once at application startup.
pub async fn init(config: DbConfig) -> Result<(), DbError> {
    init_db(config).await?;
    init_schema().await?;
    Ok(())
}
