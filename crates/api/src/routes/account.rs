//! Account route handlers: purchases, subscription state, billing profile.

use axum::{
    Json,
    extract::State,
};
use serde::Serialize;

use crate::db::billing_profiles::{BillingProfileInput, BillingProfileRepository};
use crate::db::purchases::PurchaseRepository;
use crate::db::subscriptions::SubscriptionRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{BillingProfile, Purchase, Subscription};
use crate::state::AppState;

/// Subscription state payload.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub active: bool,
    pub subscription: Option<Subscription>,
}

/// Billing profile payload. Profiles not yet saved come back blank.
#[derive(Debug, Serialize)]
pub struct BillingProfileResponse {
    #[serde(flatten)]
    pub profile: Option<BillingProfile>,
    pub complete: bool,
}

/// List the user's purchases, newest first.
///
/// # Errors
///
/// Returns an error if the purchase query fails.
pub async fn purchases(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Purchase>>> {
    let purchases = PurchaseRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(purchases))
}

/// Return the user's subscription state.
///
/// # Errors
///
/// Returns an error if the subscription query fails.
pub async fn subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SubscriptionResponse>> {
    let subscription = SubscriptionRepository::new(state.pool())
        .get_for_user(user.id)
        .await?;
    let active = subscription
        .as_ref()
        .is_some_and(|s| s.status.is_active());
    Ok(Json(SubscriptionResponse {
        active,
        subscription,
    }))
}

/// Return the user's billing profile with a completeness flag.
///
/// # Errors
///
/// Returns an error if the profile query fails.
pub async fn billing_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<BillingProfileResponse>> {
    let profile = BillingProfileRepository::new(state.pool())
        .get(user.id)
        .await?;
    let complete = profile.as_ref().is_some_and(BillingProfile::is_complete);
    Ok(Json(BillingProfileResponse { profile, complete }))
}

/// Save the user's billing profile.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn update_billing_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<BillingProfileInput>,
) -> Result<Json<BillingProfileResponse>> {
    let profile = BillingProfileRepository::new(state.pool())
        .upsert(user.id, &body)
        .await?;
    let complete = profile.is_complete();
    Ok(Json(BillingProfileResponse {
        profile: Some(profile),
        complete,
    }))
}
