//! Database migration command.
//!
//! Runs the API schema migrations, then lets the session store create its
//! own `tower_sessions` schema. Both steps are idempotent.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run all database migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Preparing session store schema...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
