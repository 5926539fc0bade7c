//! Cart repository.
//!
//! Adds and removes are idempotent at the SQL level; callers that need a
//! business-rule rejection (already purchased) check before inserting.

use sqlx::PgPool;

use fable_core::{AudiobookId, UserId};

use super::RepositoryError;
use crate::models::Audiobook;

/// Repository for cart entries.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add an audiobook to the user's cart. No-op if already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_entries (user_id, audiobook_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove an audiobook from the user's cart. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_entries WHERE user_id = $1 AND audiobook_id = $2")
            .bind(user_id)
            .bind(audiobook_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Whether the audiobook is in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<bool, RepositoryError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM cart_entries WHERE user_id = $1 AND audiobook_id = $2
             )",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// List the audiobooks in the user's cart, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Audiobook>, RepositoryError> {
        let books = sqlx::query_as::<_, Audiobook>(
            "SELECT a.id, a.title, a.author, a.description, a.price_cents, a.currency,
                    a.is_free, a.status, a.publisher_id, a.created_at, a.updated_at
             FROM cart_entries c
             JOIN audiobooks a ON a.id = c.audiobook_id
             WHERE c.user_id = $1
             ORDER BY c.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }
}
