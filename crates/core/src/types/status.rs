//! Role and status enums shared across the catalog and the session layer.

use serde::{Deserialize, Serialize};

/// Role recorded on a session user or token.
///
/// Stored as a plain string. Anything other than `"admin"` or `"user"` is kept
/// verbatim as [`Role::Other`] so that a record with an unexpected role still
/// parses (and is simply not an admin).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full access to the admin area and admin operations.
    Admin,
    /// Regular shopper.
    User,
    /// Unrecognized role string.
    Other(String),
}

impl Role {
    /// Returns the role as its stored string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Other(other) => other,
        }
    }

    /// Whether this role grants admin access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "user" => Self::User,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of a recipe bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BundleStatus {
    #[default]
    Active,
    Inactive,
    Draft,
    Archived,
}

impl BundleStatus {
    /// Returns the status as its stored string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BundleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid bundle status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_known_and_unknown_values() {
        let admin: Role = serde_json::from_str("\"admin\"").unwrap();
        let user: Role = serde_json::from_str("\"user\"").unwrap();
        let other: Role = serde_json::from_str("\"moderator\"").unwrap();

        assert!(admin.is_admin());
        assert_eq!(user, Role::User);
        assert_eq!(other, Role::Other("moderator".to_owned()));
        assert!(!other.is_admin());
    }

    #[test]
    fn test_role_is_case_sensitive() {
        let role = Role::from("Admin".to_owned());
        assert!(!role.is_admin());
    }

    #[test]
    fn test_role_serializes_as_string() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Other("guest".to_owned())).unwrap(),
            "\"guest\""
        );
    }

    #[test]
    fn test_bundle_status_round_trips_through_str() {
        for status in [
            BundleStatus::Active,
            BundleStatus::Inactive,
            BundleStatus::Draft,
            BundleStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<BundleStatus>().unwrap(), status);
        }
        assert!("retired".parse::<BundleStatus>().is_err());
    }

    #[test]
    fn test_bundle_status_defaults_to_active() {
        assert_eq!(BundleStatus::default(), BundleStatus::Active);
    }
}
