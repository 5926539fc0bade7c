//! Authentication route handlers.
//!
//! Session-backed register, login, and logout. Responses carry the session
//! user shape the frontend stores.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Credentials payload for register and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Register a new listener account and start a session.
///
/// # Errors
///
/// `Auth` for invalid email, weak password, or duplicate account.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;

    let current = CurrentUser::from(&user);
    start_session(&session, &current).await?;

    tracing::info!(user_id = %user.id, "account registered");
    Ok(Json(current))
}

/// Log in with email and password.
///
/// # Errors
///
/// `Auth` with invalid credentials; the response never distinguishes a
/// missing account from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    let current = CurrentUser::from(&user);
    start_session(&session, &current).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(current))
}

/// End the session.
pub async fn logout(session: Session) -> Result<axum::http::StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Return the current session user.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}

/// Cycle the session id and store the user.
///
/// Cycling on privilege change blocks session fixation.
async fn start_session(session: &Session, user: &CurrentUser) -> Result<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;
    set_current_user(session, user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    Ok(())
}
