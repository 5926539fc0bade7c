//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fable_core::{Email, UserId, UserRole};

/// A Fable account.
///
/// The password hash lives in a separate table and is never part of this
/// model.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may access the admin surface.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
