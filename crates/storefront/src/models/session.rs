//! Session token record and storage keys.

use bazaar_core::{Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token record kept in client storage under the `authToken` key.
///
/// Timestamps are millisecond Unix epochs. Only `expiry` is required. The
/// expiry is advisory only: it is written by the same client that reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expiry: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl AuthToken {
    /// Whether the token's expiry is at or before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// Client storage keys for session data.
pub mod keys {
    /// Key for the JSON-encoded [`super::super::StoredUser`] record.
    pub const USER: &str = "user";

    /// Key for the JSON-encoded [`super::AuthToken`] record.
    pub const AUTH_TOKEN: &str = "authToken";
}
