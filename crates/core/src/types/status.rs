//! Status and role enums for Fable entities.

use serde::{Deserialize, Serialize};

/// Audiobook publication status.
///
/// Audiobooks are only visible in the public catalog once `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "audiobook_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudiobookStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
}

/// User role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular customer: browse, purchase, and play audiobooks.
    #[default]
    Listener,
    /// Publisher: owns audiobooks and has implicit access to them.
    Creator,
    /// Full access to the admin surfaces.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listener => write!(f, "listener"),
            Self::Creator => write!(f, "creator"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listener" => Ok(Self::Listener),
            "creator" => Ok(Self::Creator),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Subscription billing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Active,
}

impl SubscriptionStatus {
    /// Whether this subscription currently grants entitlement.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audiobook_status_serde_screaming() {
        let json = serde_json::to_string(&AudiobookStatus::PendingApproval).expect("serialize");
        assert_eq!(json, "\"PENDING_APPROVAL\"");
        let back: AudiobookStatus = serde_json::from_str("\"APPROVED\"").expect("deserialize");
        assert_eq!(back, AudiobookStatus::Approved);
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("listener".parse::<UserRole>(), Ok(UserRole::Listener));
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_subscription_status() {
        assert!(SubscriptionStatus::Active.is_active());
        assert!(!SubscriptionStatus::Inactive.is_active());
    }
}
