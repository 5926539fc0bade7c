//! Chapter repository.

use sqlx::PgPool;

use fable_core::{AudiobookId, ChapterId};

use super::{RepositoryError, map_unique_violation};
use crate::models::Chapter;

const CHAPTER_COLUMNS: &str =
    "id, audiobook_id, chapter_number, title, duration_seconds, is_sample, audio_url";

/// Fields for creating or updating a chapter.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChapterInput {
    pub chapter_number: i32,
    pub title: String,
    pub duration_seconds: i32,
    pub is_sample: bool,
    pub audio_url: String,
}

/// Repository for chapter database operations.
pub struct ChapterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ChapterRepository<'a> {
    /// Create a new chapter repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List chapters of an audiobook in playback order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_audiobook(
        &self,
        audiobook_id: AudiobookId,
    ) -> Result<Vec<Chapter>, RepositoryError> {
        let chapters = sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters
             WHERE audiobook_id = $1 ORDER BY chapter_number"
        ))
        .bind(audiobook_id)
        .fetch_all(self.pool)
        .await?;

        Ok(chapters)
    }

    /// Get one chapter by audiobook and chapter number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(
        &self,
        audiobook_id: AudiobookId,
        chapter_number: i32,
    ) -> Result<Option<Chapter>, RepositoryError> {
        let chapter = sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters
             WHERE audiobook_id = $1 AND chapter_number = $2"
        ))
        .bind(audiobook_id)
        .bind(chapter_number)
        .fetch_optional(self.pool)
        .await?;

        Ok(chapter)
    }

    /// Add a chapter to an audiobook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the chapter number is taken.
    pub async fn create(
        &self,
        audiobook_id: AudiobookId,
        input: &ChapterInput,
    ) -> Result<Chapter, RepositoryError> {
        let chapter = sqlx::query_as::<_, Chapter>(&format!(
            "INSERT INTO chapters
                 (audiobook_id, chapter_number, title, duration_seconds, is_sample, audio_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CHAPTER_COLUMNS}"
        ))
        .bind(audiobook_id)
        .bind(input.chapter_number)
        .bind(&input.title)
        .bind(input.duration_seconds)
        .bind(input.is_sample)
        .bind(&input.audio_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "chapter number already exists"))?;

        Ok(chapter)
    }

    /// Update a chapter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the chapter does not exist.
    /// Returns `RepositoryError::Conflict` if the new number is taken.
    pub async fn update(
        &self,
        id: ChapterId,
        input: &ChapterInput,
    ) -> Result<Chapter, RepositoryError> {
        sqlx::query_as::<_, Chapter>(&format!(
            "UPDATE chapters SET
                 chapter_number = $2, title = $3, duration_seconds = $4,
                 is_sample = $5, audio_url = $6
             WHERE id = $1
             RETURNING {CHAPTER_COLUMNS}"
        ))
        .bind(id)
        .bind(input.chapter_number)
        .bind(&input.title)
        .bind(input.duration_seconds)
        .bind(input.is_sample)
        .bind(&input.audio_url)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "chapter number already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a chapter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the chapter does not exist.
    pub async fn delete(&self, id: ChapterId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
