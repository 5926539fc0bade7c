//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register      - Register a listener account
//! POST /api/auth/login         - Login
//! POST /api/auth/logout        - Logout
//! GET  /api/auth/me            - Current session user
//!
//! # Catalog
//! GET  /api/audiobooks                              - Approved audiobooks
//! GET  /api/audiobooks/{id}                         - Detail with chapters and access flag
//! GET  /api/audiobooks/{id}/chapters/{number}/play  - Stream URL (sample or entitled)
//! GET  /api/plans                                   - Active subscription plans
//!
//! # Payment
//! GET  /api/paypal/config                       - Client configuration or placeholder
//! POST /api/paypal/orders                       - Create an order
//! POST /api/paypal/orders/{id}/capture          - Capture an approved order
//! POST /api/paypal/subscriptions/{id}/activate  - Verify and activate a subscription
//!
//! # Cart and favorites
//! POST   /api/cart                              - Add to cart
//! DELETE /api/cart/{id}                         - Remove from cart
//! GET    /api/cart                              - List cart contents
//! GET    /api/cart/{id}/status                  - Cart membership flag
//! POST   /api/audiobooks/{id}/favorite          - Add favorite
//! DELETE /api/audiobooks/{id}/favorite          - Remove favorite
//! GET    /api/audiobooks/{id}/favorite/status   - Favorite flag
//! GET    /api/favorites                         - List favorites
//!
//! # Account (requires auth)
//! GET  /api/user/purchases        - Purchase history
//! GET  /api/user/subscription     - Subscription state
//! GET  /api/user/billing-profile  - Billing profile
//! PUT  /api/user/billing-profile  - Update billing profile
//!
//! # Admin (requires admin role)
//! /api/admin/users, /api/admin/audiobooks, /api/admin/chapters,
//! /api/admin/plans, /api/admin/settings
//! ```

pub mod account;
pub mod admin;
pub mod audiobooks;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod paypal;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the catalog routes router.
pub fn audiobook_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(audiobooks::index))
        .route("/{id}", get(audiobooks::show))
        .route("/{id}/chapters/{number}/play", get(audiobooks::play))
        .route(
            "/{id}/favorite",
            post(favorites::add).delete(favorites::remove),
        )
        .route("/{id}/favorite/status", get(favorites::status))
}

/// Create the payment routes router.
pub fn paypal_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(paypal::config))
        .route("/orders", post(paypal::create_order))
        .route("/orders/{id}/capture", post(paypal::capture_order))
        .route(
            "/subscriptions/{id}/activate",
            post(paypal::activate_subscription),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).post(cart::add))
        .route("/{id}", delete(cart::remove))
        .route("/{id}/status", get(cart::status))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(account::purchases))
        .route("/subscription", get(account::subscription))
        .route(
            "/billing-profile",
            get(account::billing_profile).put(account::update_billing_profile),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/audiobooks", audiobook_routes())
        .nest("/api/paypal", paypal_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/favorites", get(favorites::index))
        .route("/api/plans", get(paypal::list_plans))
        .nest("/api/user", account_routes())
        .nest("/api/admin", admin::routes())
}
