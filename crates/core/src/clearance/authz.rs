//! Caller identity and the admin capability.
//!
//! Mutating and reporting operations take an `&AdminCapability`. The only
//! way to get one is [`Caller::authorize_admin`].

use clearance_shared::types::id::UserId;
use serde::{Deserialize, Serialize};

use crate::clearance::error::ClearanceError;

/// Role carried in the caller's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    /// Full administrative access.
    Admin,
    /// Office staff.
    Staff,
    /// Student.
    Student,
}

impl CallerRole {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "staff" => Some(Self::Staff),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Student => "student",
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Caller's user id.
    pub user_id: UserId,
    /// Caller's role.
    pub role: CallerRole,
}

impl Caller {
    /// Creates a caller.
    #[must_use]
    pub const fn new(user_id: UserId, role: CallerRole) -> Self {
        Self { user_id, role }
    }

    /// Grants the admin capability to admins.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::Forbidden` for any other role.
    pub fn authorize_admin(&self) -> Result<AdminCapability, ClearanceError> {
        match self.role {
            CallerRole::Admin => Ok(AdminCapability {
                granted_to: self.user_id,
            }),
            other => Err(ClearanceError::Forbidden(format!(
                "role '{}' cannot perform administrative operations",
                other.as_str()
            ))),
        }
    }
}

/// Proof that the caller is an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCapability {
    granted_to: UserId,
}

impl AdminCapability {
    /// The administrator this capability was granted to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.granted_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_granted_capability() {
        let user_id = UserId::new();
        let cap = Caller::new(user_id, CallerRole::Admin)
            .authorize_admin()
            .unwrap();
        assert_eq!(cap.user_id(), user_id);
    }

    #[test]
    fn test_non_admins_are_forbidden() {
        for role in [CallerRole::Staff, CallerRole::Student] {
            let result = Caller::new(UserId::new(), role).authorize_admin();
            assert!(matches!(result, Err(ClearanceError::Forbidden(_))));
        }
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(CallerRole::parse("Admin"), Some(CallerRole::Admin));
        assert_eq!(CallerRole::parse("staff"), Some(CallerRole::Staff));
        assert_eq!(CallerRole::parse("student"), Some(CallerRole::Student));
        assert_eq!(CallerRole::parse("owner"), None);
    }
}
