//! Checkout error types.

use thiserror::Error;

/// Errors that can occur while orchestrating a checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Payment is not configured on the server. Rendered as an
    /// informational placeholder, never surfaced as an error.
    #[error("payment is not configured")]
    NotConfigured,

    /// The external SDK script failed to load. No automatic retry.
    #[error("payment script failed to load: {0}")]
    ScriptLoad(String),

    /// HTTP transport failure talking to the Fable API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The user is not authenticated (401). The UI prompts a login.
    #[error("not logged in")]
    Unauthorized,

    /// A business-rule conflict (409), e.g. the audiobook is already
    /// purchased.
    #[error("{0}")]
    Conflict(String),

    /// Any other API error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The button was unmounted while a call was in flight. Results are
    /// discarded silently; this error is never shown to the user.
    #[error("checkout flow cancelled")]
    Cancelled,

    /// Widget render or teardown failure reported by the SDK.
    #[error("widget error: {0}")]
    Widget(String),
}

impl CheckoutError {
    /// Map an API response status and body to the error taxonomy.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            409 => Self::Conflict(message),
            _ => Self::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(
            CheckoutError::from_status(401, String::new()),
            CheckoutError::Unauthorized
        ));
        assert!(matches!(
            CheckoutError::from_status(409, "already purchased".into()),
            CheckoutError::Conflict(_)
        ));
        assert!(matches!(
            CheckoutError::from_status(500, "boom".into()),
            CheckoutError::Api { status: 500, .. }
        ));
    }
}
