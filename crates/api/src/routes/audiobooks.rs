//! Catalog route handlers.
//!
//! Public listing and detail for approved audiobooks, plus the chapter
//! play endpoint that gates the stream URL behind the access check.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use fable_core::AudiobookId;

use crate::db::audiobooks::AudiobookRepository;
use crate::db::chapters::ChapterRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Audiobook, Chapter};
use crate::services::entitlement::EntitlementService;
use crate::state::AppState;

/// Audiobook detail payload.
#[derive(Debug, Serialize)]
pub struct AudiobookDetail {
    #[serde(flatten)]
    pub audiobook: Audiobook,
    pub chapters: Vec<Chapter>,
    /// Whether the requester may play non-sample chapters.
    pub has_access: bool,
}

/// Stream URL payload for an entitled chapter request.
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub audio_url: String,
}

/// List approved audiobooks.
///
/// # Errors
///
/// Returns an error if the catalog query fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Audiobook>>> {
    let audiobooks = AudiobookRepository::new(state.pool()).list_approved().await?;
    Ok(Json(audiobooks))
}

/// Show one approved audiobook with its chapters and the access flag.
///
/// Anonymous requesters get access only to free content.
///
/// # Errors
///
/// `NotFound` for unknown or unpublished ids.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<AudiobookId>,
) -> Result<Json<AudiobookDetail>> {
    let audiobook = published_audiobook(&state, id).await?;
    let chapters = ChapterRepository::new(state.pool())
        .list_for_audiobook(id)
        .await?;

    let has_access = match user {
        Some(user) => {
            EntitlementService::new(state.pool(), state.entitlements())
                .check(user.id, &audiobook)
                .await?
        }
        None => audiobook.is_free_content(),
    };

    Ok(Json(AudiobookDetail {
        audiobook,
        chapters,
        has_access,
    }))
}

/// Return the stream URL for one chapter.
///
/// Samples play for everyone. Everything else requires a purchase, an
/// active subscription, or free content.
///
/// # Errors
///
/// `NotFound` for unknown chapters, `Forbidden` when the requester lacks
/// access, `Unauthorized` for anonymous requests to non-sample chapters.
pub async fn play(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path((id, number)): Path<(AudiobookId, i32)>,
) -> Result<Json<PlayResponse>> {
    let audiobook = published_audiobook(&state, id).await?;
    let chapter = ChapterRepository::new(state.pool())
        .get_by_number(id, number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("chapter {number} of audiobook {id}")))?;

    if chapter.is_sample || audiobook.is_free_content() {
        return Ok(Json(PlayResponse {
            audio_url: chapter.audio_url,
        }));
    }

    let Some(user) = user else {
        return Err(AppError::Unauthorized(
            "log in to play this chapter".to_owned(),
        ));
    };

    let allowed = EntitlementService::new(state.pool(), state.entitlements())
        .check_chapter(user.id, &audiobook, &chapter)
        .await?;
    if !allowed {
        return Err(AppError::Forbidden(
            "purchase or subscribe to play this chapter".to_owned(),
        ));
    }

    Ok(Json(PlayResponse {
        audio_url: chapter.audio_url,
    }))
}

/// Fetch an audiobook, treating unpublished ones as missing.
pub(crate) async fn published_audiobook(
    state: &AppState,
    id: AudiobookId,
) -> Result<Audiobook> {
    AudiobookRepository::new(state.pool())
        .get(id)
        .await?
        .filter(Audiobook::is_published)
        .ok_or_else(|| AppError::NotFound(format!("audiobook {id}")))
}
