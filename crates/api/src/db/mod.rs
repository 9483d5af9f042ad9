//! Database access layer.
//!
//! Each table gets a thin repository struct borrowing the pool. Queries are
//! runtime-checked; row structs map to domain types via `TryFrom`, so a
//! malformed row surfaces as [`RepositoryError::DataCorruption`] instead of
//! a panic.

pub mod admins;
pub mod orders;
pub mod products;

pub use admins::AdminRepository;
pub use orders::{OrderRepository, OrderStats};
pub use products::ProductRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::ApiConfig;

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row failed to map to a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the initial connection fails.
pub async fn create_pool(config: &ApiConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(config.database_url.expose_secret())
        .await
}
