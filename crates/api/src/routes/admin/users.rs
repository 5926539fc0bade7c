//! Admin user management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use fable_core::{UserId, UserRole};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::entitlement::EntitlementService;
use crate::state::AppState;

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

/// List all users.
///
/// # Errors
///
/// Returns an error if the user query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Change a user's role.
///
/// Admins cannot change their own role, so the last admin cannot lock
/// everyone out.
///
/// # Errors
///
/// `NotFound` for unknown ids, `BadRequest` for self-demotion.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<SetRoleRequest>,
) -> Result<Json<User>> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "cannot change your own role".to_owned(),
        ));
    }
    let user = UserRepository::new(state.pool())
        .set_role(id, body.role)
        .await?;

    // The role feeds the entitlement decision; drop the stale ones
    EntitlementService::new(state.pool(), state.entitlements()).invalidate_user(id);
    tracing::info!(user_id = %id, role = %body.role, "user role changed");
    Ok(Json(user))
}

/// Delete a user account.
///
/// # Errors
///
/// `BadRequest` for self-deletion, otherwise the repository error.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_owned(),
        ));
    }
    UserRepository::new(state.pool()).delete(id).await?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
