//! Admin audiobook management handlers.
//!
//! Moderation here is the only path that changes audiobook status; the
//! public catalog serves approved rows only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use fable_core::{AudiobookId, AudiobookStatus};

use crate::db::audiobooks::{AudiobookInput, AudiobookRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Audiobook;
use crate::state::AppState;

/// Largest accepted bulk moderation batch.
const MAX_BULK_IDS: usize = 50;

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: AudiobookStatus,
}

/// Request body for bulk moderation.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<AudiobookId>,
    pub status: AudiobookStatus,
}

/// Response body for bulk moderation.
#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    pub updated: u64,
}

/// List every audiobook regardless of status.
///
/// # Errors
///
/// Returns an error if the catalog query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Audiobook>>> {
    let audiobooks = AudiobookRepository::new(state.pool()).list_all().await?;
    Ok(Json(audiobooks))
}

/// Create an audiobook. New rows start in draft.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<AudiobookInput>,
) -> Result<(StatusCode, Json<Audiobook>)> {
    let audiobook = AudiobookRepository::new(state.pool()).create(&body).await?;
    tracing::info!(audiobook_id = %audiobook.id, "audiobook created");
    Ok((StatusCode::CREATED, Json(audiobook)))
}

/// Update an audiobook's metadata. Status is untouched.
///
/// # Errors
///
/// `NotFound` for unknown ids.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<AudiobookId>,
    Json(body): Json<AudiobookInput>,
) -> Result<Json<Audiobook>> {
    let audiobook = AudiobookRepository::new(state.pool())
        .update(id, &body)
        .await?;
    Ok(Json(audiobook))
}

/// Set one audiobook's moderation status.
///
/// # Errors
///
/// `NotFound` for unknown ids.
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<AudiobookId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<Audiobook>> {
    let audiobook = AudiobookRepository::new(state.pool())
        .set_status(id, body.status)
        .await?;
    tracing::info!(audiobook_id = %id, status = ?body.status, "audiobook status changed");
    Ok(Json(audiobook))
}

/// Set the moderation status for a batch of audiobooks.
///
/// Batches are capped at 50 ids. Unknown ids are skipped; the response
/// reports how many rows actually changed.
///
/// # Errors
///
/// `BadRequest` for an empty or oversized batch.
pub async fn bulk_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<BulkStatusRequest>,
) -> Result<Json<BulkStatusResponse>> {
    if !batch_size_ok(body.ids.len()) {
        return Err(AppError::BadRequest(format!(
            "bulk status accepts 1 to {MAX_BULK_IDS} ids"
        )));
    }

    let updated = AudiobookRepository::new(state.pool())
        .bulk_set_status(&body.ids, body.status)
        .await?;
    tracing::info!(updated, status = ?body.status, "bulk status applied");
    Ok(Json(BulkStatusResponse { updated }))
}

fn batch_size_ok(len: usize) -> bool {
    (1..=MAX_BULK_IDS).contains(&len)
}

/// Delete an audiobook and its chapters.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<AudiobookId>,
) -> Result<StatusCode> {
    AudiobookRepository::new(state.pool()).delete(id).await?;
    tracing::info!(audiobook_id = %id, "audiobook deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_batch_rejects_empty_and_oversized() {
        assert!(!batch_size_ok(0));
        assert!(batch_size_ok(1));
        assert!(batch_size_ok(MAX_BULK_IDS));
        assert!(!batch_size_ok(MAX_BULK_IDS + 1));
    }
}
