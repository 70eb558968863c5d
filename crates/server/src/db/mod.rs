//! Database operations for the studio `PostgreSQL` store.
//!
//! # Tables
//!
//! - `accounts` - Registered identities with credit balances (keyed by email)
//! - `artifacts` - Saved generated images with prompts and mode tags
//! - `support_messages` - User/administrator chat turns (append-only)
//! - `site_config` - SEO metadata singleton
//! - `sessions` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run at startup via
//! `sqlx::migrate!`.
//!
//! # Concurrency
//!
//! The only concurrency-safety primitive relied upon is the atomic
//! field-level increment (`SET col = col + $n`), used for `balance` and the
//! activity counters. Everything else is last-writer-wins by design.

pub mod accounts;
pub mod artifacts;
pub mod messages;
pub mod site_config;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique constraint violation (e.g., duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value failed validation on read.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
