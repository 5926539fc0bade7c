//! Admin subscription plan management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use fable_core::PlanId;

use crate::db::plans::{PlanInput, PlanRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Plan;
use crate::state::AppState;

/// List every plan, active or not.
///
/// # Errors
///
/// Returns an error if the plan query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Plan>>> {
    let plans = PlanRepository::new(state.pool()).list_all().await?;
    Ok(Json(plans))
}

/// Create a plan.
///
/// The `paypal_plan_id` must already exist on the PayPal side; activation
/// checks approved subscriptions against it.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<PlanInput>,
) -> Result<(StatusCode, Json<Plan>)> {
    let plan = PlanRepository::new(state.pool()).create(&body).await?;
    tracing::info!(plan_id = %plan.id, "plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Update a plan.
///
/// # Errors
///
/// `NotFound` for unknown ids.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<PlanId>,
    Json(body): Json<PlanInput>,
) -> Result<Json<Plan>> {
    let plan = PlanRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(plan))
}

/// Delete a plan.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<PlanId>,
) -> Result<StatusCode> {
    PlanRepository::new(state.pool()).delete(id).await?;
    tracing::info!(plan_id = %id, "plan deleted");
    Ok(StatusCode::NO_CONTENT)
}
