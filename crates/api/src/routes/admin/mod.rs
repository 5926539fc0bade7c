//! Admin route handlers.
//!
//! Every handler takes `RequireAdmin`, so non-admin sessions get 403
//! before any work happens.
//!
//! ```text
//! GET    /api/admin/users                   - List users
//! PUT    /api/admin/users/{id}/role         - Change a user's role
//! DELETE /api/admin/users/{id}              - Delete a user
//!
//! GET    /api/admin/audiobooks              - All audiobooks, any status
//! POST   /api/admin/audiobooks              - Create
//! PUT    /api/admin/audiobooks/{id}         - Update
//! DELETE /api/admin/audiobooks/{id}         - Delete
//! PUT    /api/admin/audiobooks/{id}/status  - Moderate one audiobook
//! POST   /api/admin/audiobooks/bulk-status  - Moderate up to 50 at once
//!
//! GET    /api/admin/audiobooks/{id}/chapters - List chapters
//! POST   /api/admin/audiobooks/{id}/chapters - Create a chapter
//! PUT    /api/admin/chapters/{id}            - Update a chapter
//! DELETE /api/admin/chapters/{id}            - Delete a chapter
//!
//! GET    /api/admin/plans                   - All plans
//! POST   /api/admin/plans                   - Create
//! PUT    /api/admin/plans/{id}              - Update
//! DELETE /api/admin/plans/{id}              - Delete
//!
//! GET    /api/admin/services                - External service links
//! POST   /api/admin/services                - Create
//! PUT    /api/admin/services/{id}           - Update
//! DELETE /api/admin/services/{id}           - Delete
//! GET    /api/admin/settings/{key}          - Read a setting
//! PUT    /api/admin/settings/{key}          - Write a setting
//! ```

pub mod audiobooks;
pub mod chapters;
pub mod plans;
pub mod settings;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create all admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::index))
        .route("/users/{id}/role", put(users::set_role))
        .route("/users/{id}", delete(users::destroy))
        .route(
            "/audiobooks",
            get(audiobooks::index).post(audiobooks::create),
        )
        .route("/audiobooks/bulk-status", post(audiobooks::bulk_status))
        .route(
            "/audiobooks/{id}",
            put(audiobooks::update).delete(audiobooks::destroy),
        )
        .route("/audiobooks/{id}/status", put(audiobooks::set_status))
        .route(
            "/audiobooks/{id}/chapters",
            get(chapters::index).post(chapters::create),
        )
        .route(
            "/chapters/{id}",
            put(chapters::update).delete(chapters::destroy),
        )
        .route("/plans", get(plans::index).post(plans::create))
        .route("/plans/{id}", put(plans::update).delete(plans::destroy))
        .route(
            "/services",
            get(settings::services).post(settings::create_service),
        )
        .route(
            "/services/{id}",
            put(settings::update_service).delete(settings::destroy_service),
        )
        .route(
            "/settings/{key}",
            get(settings::get_setting).put(settings::put_setting),
        )
}
