//! Audiobook chapter model.

use serde::Serialize;

use fable_core::{AudiobookId, ChapterId};

/// One chapter of an audiobook.
///
/// Sample chapters are playable by anyone; the rest require entitlement.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: ChapterId,
    pub audiobook_id: AudiobookId,
    pub chapter_number: i32,
    pub title: String,
    pub duration_seconds: i32,
    pub is_sample: bool,
    /// Storage URL; only disclosed to authorized listeners.
    #[serde(skip_serializing)]
    pub audio_url: String,
}
