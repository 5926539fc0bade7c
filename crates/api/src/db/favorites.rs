//! Favorites repository.

use sqlx::PgPool;

use fable_core::{AudiobookId, UserId};

use super::RepositoryError;
use crate::models::Audiobook;

/// Repository for favorite markers.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorites repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mark an audiobook as a favorite. No-op if already marked.
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
            "INSERT INTO favorites (user_id, audiobook_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Unmark a favorite. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        audiobook_id: AudiobookId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND audiobook_id = $2")
            .bind(user_id)
            .bind(audiobook_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Whether the audiobook is a favorite of the user.
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
                 SELECT 1 FROM favorites WHERE user_id = $1 AND audiobook_id = $2
             )",
        )
        .bind(user_id)
        .bind(audiobook_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// List the user's favorite audiobooks, most recently marked first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Audiobook>, RepositoryError> {
        let books = sqlx::query_as::<_, Audiobook>(
            "SELECT a.id, a.title, a.author, a.description, a.price_cents, a.currency,
                    a.is_free, a.status, a.publisher_id, a.created_at, a.updated_at
             FROM favorites f
             JOIN audiobooks a ON a.id = f.audiobook_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }
}
