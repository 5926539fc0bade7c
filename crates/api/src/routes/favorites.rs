//! Favorites route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use fable_core::AudiobookId;

use crate::db::favorites::FavoriteRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Audiobook;
use crate::routes::audiobooks::published_audiobook;
use crate::state::AppState;

/// Favorite membership flag.
#[derive(Debug, Serialize)]
pub struct FavoriteStatusResponse {
    pub is_favorite: bool,
}

/// List the user's favorites.
///
/// # Errors
///
/// Returns an error if the favorites query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Audiobook>>> {
    let audiobooks = FavoriteRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(audiobooks))
}

/// Mark an audiobook as a favorite. Idempotent.
///
/// # Errors
///
/// `NotFound` for unpublished audiobooks.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AudiobookId>,
) -> Result<StatusCode> {
    published_audiobook(&state, id).await?;
    FavoriteRepository::new(state.pool()).add(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a favorite. Removing an absent id succeeds.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AudiobookId>,
) -> Result<StatusCode> {
    FavoriteRepository::new(state.pool())
        .remove(user.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report whether an audiobook is a favorite.
///
/// # Errors
///
/// Returns an error if the membership query fails.
pub async fn status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AudiobookId>,
) -> Result<Json<FavoriteStatusResponse>> {
    let is_favorite = FavoriteRepository::new(state.pool())
        .contains(user.id, id)
        .await?;
    Ok(Json(FavoriteStatusResponse { is_favorite }))
}
