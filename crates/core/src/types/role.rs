//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}. Valid roles: visitor, advertiser, admin")]
pub struct RoleParseError(pub String);

/// Role of a platform user.
///
/// The backend is authoritative; the front end only uses the role for
/// rendering decisions and client-side redirects. Real access control is
/// enforced by the backend on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browsing user without a subscription.
    #[default]
    Visitor,
    /// Paying user who manages a company listing.
    Advertiser,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Whether this role grants access to the admin area.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire form used by the backend API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Advertiser => "advertiser",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitor" => Ok(Self::Visitor),
            "advertiser" => Ok(Self::Advertiser),
            "admin" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [Role::Visitor, Role::Advertiser, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_unknown() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Advertiser.is_admin());
        assert!(!Role::Visitor.is_admin());
    }

    #[test]
    fn test_wire_form() {
        let role: Role = serde_json::from_str("\"advertiser\"").unwrap();
        assert_eq!(role, Role::Advertiser);
    }
}
