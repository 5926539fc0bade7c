//! Audiobook catalog repository.

use sqlx::PgPool;

use fable_core::{AudiobookId, AudiobookStatus, UserId};

use super::RepositoryError;
use crate::models::Audiobook;

const AUDIOBOOK_COLUMNS: &str = "id, title, author, description, price_cents, currency, \
     is_free, status, publisher_id, created_at, updated_at";

/// Fields for creating or updating an audiobook.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AudiobookInput {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub is_free: bool,
    pub publisher_id: Option<UserId>,
}

/// Repository for audiobook database operations.
pub struct AudiobookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AudiobookRepository<'a> {
    /// Create a new audiobook repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List approved audiobooks for the public catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(&self) -> Result<Vec<Audiobook>, RepositoryError> {
        let books = sqlx::query_as::<_, Audiobook>(&format!(
            "SELECT {AUDIOBOOK_COLUMNS} FROM audiobooks
             WHERE status = 'APPROVED' ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// List every audiobook regardless of status (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Audiobook>, RepositoryError> {
        let books = sqlx::query_as::<_, Audiobook>(&format!(
            "SELECT {AUDIOBOOK_COLUMNS} FROM audiobooks ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Get one audiobook by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AudiobookId) -> Result<Option<Audiobook>, RepositoryError> {
        let book = sqlx::query_as::<_, Audiobook>(&format!(
            "SELECT {AUDIOBOOK_COLUMNS} FROM audiobooks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(book)
    }

    /// Create a new audiobook in `Draft` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &AudiobookInput) -> Result<Audiobook, RepositoryError> {
        let book = sqlx::query_as::<_, Audiobook>(&format!(
            "INSERT INTO audiobooks
                 (title, author, description, price_cents, currency, is_free, publisher_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {AUDIOBOOK_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.currency)
        .bind(input.is_free)
        .bind(input.publisher_id)
        .fetch_one(self.pool)
        .await?;

        Ok(book)
    }

    /// Update an audiobook's catalog fields. Status is changed separately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the audiobook does not exist.
    pub async fn update(
        &self,
        id: AudiobookId,
        input: &AudiobookInput,
    ) -> Result<Audiobook, RepositoryError> {
        sqlx::query_as::<_, Audiobook>(&format!(
            "UPDATE audiobooks SET
                 title = $2, author = $3, description = $4, price_cents = $5,
                 currency = $6, is_free = $7, publisher_id = $8, updated_at = now()
             WHERE id = $1
             RETURNING {AUDIOBOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.currency)
        .bind(input.is_free)
        .bind(input.publisher_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Change the publication status of one audiobook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the audiobook does not exist.
    pub async fn set_status(
        &self,
        id: AudiobookId,
        status: AudiobookStatus,
    ) -> Result<Audiobook, RepositoryError> {
        sqlx::query_as::<_, Audiobook>(&format!(
            "UPDATE audiobooks SET status = $2, updated_at = now() WHERE id = $1
             RETURNING {AUDIOBOOK_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Change the status of many audiobooks at once. Returns the number of
    /// rows updated; ids that do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn bulk_set_status(
        &self,
        ids: &[AudiobookId],
        status: AudiobookStatus,
    ) -> Result<u64, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let result = sqlx::query(
            "UPDATE audiobooks SET status = $2, updated_at = now() WHERE id = ANY($1)",
        )
        .bind(&raw_ids)
        .bind(status)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an audiobook and its chapters (cascading).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the audiobook does not exist.
    pub async fn delete(&self, id: AudiobookId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM audiobooks WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
