//! Session-stored user identity.

use serde::{Deserialize, Serialize};

use fable_core::{UserId, UserRole};

use crate::models::User;

/// Session keys used across the application.
pub mod session_keys {
    /// The logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this user may access the admin surface.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            role: user.role,
        }
    }
}
