//! Database operations for the Fable `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` / `user_password` - Accounts and password hashes
//! - `audiobooks` / `chapters` - Catalog
//! - `purchases` - One row per owned audiobook, unique `(user, audiobook)`
//! - `plans` / `subscriptions` - Recurring billing
//! - `favorites` / `cart_entries` - Per-user collections
//! - `billing_profiles` - Checkout precondition data
//! - `external_services` / `app_settings` - Admin-managed configuration
//!
//! The tower-sessions store manages its own schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p fable-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod audiobooks;
pub mod billing_profiles;
pub mod cart;
pub mod chapters;
pub mod favorites;
pub mod plans;
pub mod purchases;
pub mod settings;
pub mod subscriptions;
pub mod users;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, duplicate purchase).
    #[error("constraint violation: {0}")]
    Conflict(String),
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

/// Map a unique-constraint violation to `Conflict`, everything else to
/// `Database`.
fn map_unique_violation(e: sqlx::Error, conflict_message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(conflict_message.to_owned());
    }
    RepositoryError::Database(e)
}
