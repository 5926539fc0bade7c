//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::entitlement::{self, EntitlementCache};
use crate::services::paypal::PayPalClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    paypal: Option<PayPalClient>,
    entitlements: EntitlementCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The PayPal client is constructed only when credentials are
    /// configured; otherwise payment endpoints serve the placeholder.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let paypal = config.paypal.clone().map(PayPalClient::new);
        if paypal.is_none() {
            tracing::warn!("PayPal credentials not set; payment is not configured");
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                paypal,
                entitlements: entitlement::build_cache(),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the PayPal client, if payment is configured.
    #[must_use]
    pub fn paypal(&self) -> Option<&PayPalClient> {
        self.inner.paypal.as_ref()
    }

    /// Get the entitlement decision cache.
    #[must_use]
    pub fn entitlements(&self) -> &EntitlementCache {
        &self.inner.entitlements
    }
}
