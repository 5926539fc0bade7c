//! Cart route handlers.
//!
//! The cart holds audiobook ids per user. Adding an audiobook the user
//! already owns is rejected so the cart never carries unpurchasable items.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use fable_core::AudiobookId;

use crate::db::cart::CartRepository;
use crate::db::purchases::PurchaseRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Audiobook;
use crate::routes::audiobooks::published_audiobook;
use crate::state::AppState;

/// Request body for adding to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub audiobook_id: AudiobookId,
}

/// Cart membership flag.
#[derive(Debug, Serialize)]
pub struct CartStatusResponse {
    pub in_cart: bool,
}

/// List the cart contents.
///
/// # Errors
///
/// Returns an error if the cart query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Audiobook>>> {
    let audiobooks = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(audiobooks))
}

/// Add an audiobook to the cart.
///
/// Idempotent for repeated adds of the same id.
///
/// # Errors
///
/// `NotFound` for unpublished audiobooks, `Conflict` when the user
/// already owns it.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<StatusCode> {
    published_audiobook(&state, body.audiobook_id).await?;

    if PurchaseRepository::new(state.pool())
        .exists(user.id, body.audiobook_id)
        .await?
    {
        return Err(AppError::Conflict("audiobook already purchased".to_owned()));
    }

    CartRepository::new(state.pool())
        .add(user.id, body.audiobook_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove an audiobook from the cart.
///
/// # Errors
///
/// Returns an error if the delete fails. Removing an absent id succeeds.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AudiobookId>,
) -> Result<StatusCode> {
    CartRepository::new(state.pool()).remove(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report whether an audiobook is in the cart.
///
/// # Errors
///
/// Returns an error if the membership query fails.
pub async fn status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AudiobookId>,
) -> Result<Json<CartStatusResponse>> {
    let in_cart = CartRepository::new(state.pool())
        .contains(user.id, id)
        .await?;
    Ok(Json(CartStatusResponse { in_cart }))
}
