//! Session user record.

use bazaar_core::{Email, Role, UserId};
use serde::{Deserialize, Deserializer, Serialize};

/// User record kept in client storage under the `user` key.
///
/// Nothing binds this record to the token stored next to it; whoever can
/// write the storage can write any role here. Only `role` is required: a
/// record such as `{"role":"admin"}` is a complete session user, and an
/// email that fails validation loads as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_email",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Email>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl StoredUser {
    /// A record with every field filled in.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: Email, role: Role) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            email: Some(email),
            role,
            permissions: Vec::new(),
        }
    }

    /// Whether the record claims the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn lenient_email<'de, D>(deserializer: D) -> Result<Option<Email>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| Email::parse(s).ok()))
}
