//! Per-request session context.

use serde::de::DeserializeOwned;
use tracing::warn;

use super::storage::ClientStorage;
use crate::models::{AuthToken, StoredUser, session_keys};

/// The user and token records read once from client storage.
///
/// Admin operations receive this explicitly instead of reading storage
/// themselves. Missing, unreadable, and malformed records all load as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<StoredUser>,
    token: Option<AuthToken>,
}

impl SessionContext {
    /// Context with no user and no token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
        }
    }

    /// Context built from already-parsed records.
    #[must_use]
    pub const fn new(user: Option<StoredUser>, token: Option<AuthToken>) -> Self {
        Self { user, token }
    }

    /// Read both session records from `storage`.
    pub async fn load<S: ClientStorage>(storage: &S) -> Self {
        let user = read_record::<StoredUser, S>(storage, session_keys::USER).await;
        let token = read_record::<AuthToken, S>(storage, session_keys::AUTH_TOKEN).await;
        Self { user, token }
    }

    /// The stored user, if one parsed.
    #[must_use]
    pub const fn user(&self) -> Option<&StoredUser> {
        self.user.as_ref()
    }

    /// The stored token, if one parsed.
    #[must_use]
    pub const fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Role check used by every admin operation.
    ///
    /// Only the user record's role is consulted; token presence and expiry
    /// are the gate's concern.
    #[must_use]
    pub fn verify_admin_access(&self) -> bool {
        self.user.as_ref().is_some_and(StoredUser::is_admin)
    }
}

/// Read and parse one JSON record, logging and discarding failures.
pub(crate) async fn read_record<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: ClientStorage,
{
    let raw = match storage.get_item(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "Failed to read session record");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed session record");
            None
        }
    }
}
