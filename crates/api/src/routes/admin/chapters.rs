//! Admin chapter management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use fable_core::{AudiobookId, ChapterId};

use crate::db::chapters::{ChapterInput, ChapterRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Chapter;
use crate::state::AppState;

/// List the chapters of one audiobook, in playback order.
///
/// # Errors
///
/// Returns an error if the chapter query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(audiobook_id): Path<AudiobookId>,
) -> Result<Json<Vec<Chapter>>> {
    let chapters = ChapterRepository::new(state.pool())
        .list_for_audiobook(audiobook_id)
        .await?;
    Ok(Json(chapters))
}

/// Add a chapter to an audiobook.
///
/// # Errors
///
/// `Conflict` when the chapter number is already taken.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(audiobook_id): Path<AudiobookId>,
    Json(body): Json<ChapterInput>,
) -> Result<(StatusCode, Json<Chapter>)> {
    let chapter = ChapterRepository::new(state.pool())
        .create(audiobook_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// Update a chapter.
///
/// # Errors
///
/// `NotFound` for unknown ids, `Conflict` on a chapter number collision.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ChapterId>,
    Json(body): Json<ChapterInput>,
) -> Result<Json<Chapter>> {
    let chapter = ChapterRepository::new(state.pool())
        .update(id, &body)
        .await?;
    Ok(Json(chapter))
}

/// Delete a chapter.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ChapterId>,
) -> Result<StatusCode> {
    ChapterRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
