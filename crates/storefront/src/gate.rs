//! Admin area gate.
//!
//! A gate starts in [`GateState::Checking`], waits an artificial delay, then
//! resolves once against client storage. Resolved states are final.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::StoredUser;
use crate::session::{ClientStorage, SessionContext, clear_session};

/// Delay applied before a gate evaluates storage.
pub const DEFAULT_GATE_DELAY: Duration = Duration::from_millis(800);

/// Why the gate refused entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    AuthenticationRequired,
    SessionExpired,
    InsufficientPermissions,
}

impl DenialReason {
    /// Value used in the `reason` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication_required",
            Self::SessionExpired => "session_expired",
            Self::InsufficientPermissions => "insufficient_permissions",
        }
    }

    /// Message shown on the unauthorized page.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "Authentication required",
            Self::SessionExpired => "Session expired",
            Self::InsufficientPermissions => "Insufficient permissions",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Granted(StoredUser),
    Denied(DenialReason),
}

impl GateState {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Checking)
    }
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    state: GateState,
    delay: Duration,
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_DELAY)
    }
}

impl AdminGate {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            state: GateState::Checking,
            delay,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GateState {
        &self.state
    }

    /// Wait the configured delay, then resolve against `storage`.
    pub async fn check<S: ClientStorage>(&mut self, storage: &S) -> &GateState {
        if !self.state.is_resolved() && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.check_at(storage, Utc::now()).await
    }

    /// Resolve against `storage` as of `now`, without the delay.
    ///
    /// A gate that already resolved returns its state without reading storage.
    pub async fn check_at<S: ClientStorage>(&mut self, storage: &S, now: DateTime<Utc>) -> &GateState {
        if !self.state.is_resolved() {
            self.state = evaluate(storage, now).await;
        }
        &self.state
    }
}

/// Decide admin access from the records in `storage`.
///
/// An expired token clears both session records before denying.
pub async fn evaluate<S: ClientStorage>(storage: &S, now: DateTime<Utc>) -> GateState {
    let ctx = SessionContext::load(storage).await;

    let (Some(user), Some(token)) = (ctx.user(), ctx.token()) else {
        debug!("No session records, denying admin access");
        return GateState::Denied(DenialReason::AuthenticationRequired);
    };

    if token.is_expired_at(now) {
        info!(user_id = ?user.id, expiry = %token.expiry, "Session expired, clearing");
        if let Err(e) = clear_session(storage).await {
            warn!(error = %e, "Failed to clear expired session");
        }
        return GateState::Denied(DenialReason::SessionExpired);
    }

    if !user.is_admin() {
        info!(user_id = ?user.id, role = %user.role, "Non-admin denied");
        return GateState::Denied(DenialReason::InsufficientPermissions);
    }

    GateState::Granted(user.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use chrono::Duration as TimeDelta;

    use super::*;
    use crate::models::session_keys;
    use crate::session::{MemoryStorage, login_as_regular_user, simulate_admin_access};

    fn ttl() -> TimeDelta {
        TimeDelta::hours(24)
    }

    #[tokio::test]
    async fn test_empty_storage_requires_authentication() {
        let storage = MemoryStorage::new();
        let mut gate = AdminGate::new(Duration::ZERO);
        assert_eq!(gate.state(), &GateState::Checking);

        let state = gate.check(&storage).await;
        assert_eq!(state, &GateState::Denied(DenialReason::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_user_without_token_requires_authentication() {
        let storage = MemoryStorage::new();
        simulate_admin_access(&storage, Utc::now(), ttl()).await.unwrap();
        storage.remove_item(session_keys::AUTH_TOKEN).await.unwrap();

        let state = evaluate(&storage, Utc::now()).await;
        assert_eq!(state, GateState::Denied(DenialReason::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_malformed_user_requires_authentication() {
        let now = Utc::now();
        let storage = MemoryStorage::new();
        simulate_admin_access(&storage, now, ttl()).await.unwrap();
        storage
            .set_item(session_keys::USER, "{not json".to_owned())
            .await
            .unwrap();

        assert_eq!(
            evaluate(&storage, now).await,
            GateState::Denied(DenialReason::AuthenticationRequired)
        );
    }

    #[tokio::test]
    async fn test_admin_is_granted() {
        let now = Utc::now();
        let storage = MemoryStorage::new();
        let admin = simulate_admin_access(&storage, now, ttl()).await.unwrap();

        let mut gate = AdminGate::default();
        assert_eq!(gate.check_at(&storage, now).await, &GateState::Granted(admin));
    }

    #[tokio::test]
    async fn test_expired_token_clears_session() {
        let issued = Utc::now();
        let storage = MemoryStorage::new();
        simulate_admin_access(&storage, issued, ttl()).await.unwrap();

        let later = issued + ttl();
        assert_eq!(
            evaluate(&storage, later).await,
            GateState::Denied(DenialReason::SessionExpired)
        );
        assert!(!storage.contains(session_keys::USER));
        assert!(!storage.contains(session_keys::AUTH_TOKEN));
    }

    #[tokio::test]
    async fn test_regular_user_is_denied_and_storage_kept() {
        let now = Utc::now();
        let storage = MemoryStorage::new();
        login_as_regular_user(&storage, now, ttl()).await.unwrap();

        assert_eq!(
            evaluate(&storage, now).await,
            GateState::Denied(DenialReason::InsufficientPermissions)
        );
        assert!(storage.contains(session_keys::USER));
        assert!(storage.contains(session_keys::AUTH_TOKEN));
    }

    #[tokio::test]
    async fn test_resolved_state_is_final() {
        let now = Utc::now();
        let storage = MemoryStorage::new();
        let mut gate = AdminGate::new(Duration::ZERO);
        gate.check_at(&storage, now).await;

        simulate_admin_access(&storage, now, ttl()).await.unwrap();
        assert_eq!(
            gate.check_at(&storage, now).await,
            &GateState::Denied(DenialReason::AuthenticationRequired)
        );
    }

    fn raw_storage(user: Option<&str>, expiry: Option<DateTime<Utc>>) -> MemoryStorage {
        let mut items = Vec::new();
        if let Some(user) = user {
            items.push((session_keys::USER, user.to_owned()));
        }
        if let Some(expiry) = expiry {
            let token = format!(r#"{{"expiry":{}}}"#, expiry.timestamp_millis());
            items.push((session_keys::AUTH_TOKEN, token));
        }
        MemoryStorage::with_items(items)
    }

    #[tokio::test]
    async fn test_hand_written_records() {
        let now = Utc::now();
        let past = now - TimeDelta::minutes(5);
        let future = now + TimeDelta::minutes(5);

        let cases = [
            (Some(r#"{"role":"user"}"#), Some(future), Some(DenialReason::InsufficientPermissions)),
            (Some(r#"{"role":"admin"}"#), Some(past), Some(DenialReason::SessionExpired)),
            (Some(r#"{"role":"admin"}"#), Some(now), Some(DenialReason::SessionExpired)),
            (Some(r#"{"role":"admin"}"#), Some(future), None),
            (Some(r#"{"role":"admin"}"#), None, Some(DenialReason::AuthenticationRequired)),
            (None, Some(future), Some(DenialReason::AuthenticationRequired)),
            (Some(r#"{"name":"no role"}"#), Some(future), Some(DenialReason::AuthenticationRequired)),
        ];

        for (user, expiry, expected) in cases {
            let storage = raw_storage(user, expiry);
            let state = evaluate(&storage, now).await;
            match expected {
                Some(reason) => assert_eq!(state, GateState::Denied(reason), "{user:?} {expiry:?}"),
                None => assert!(matches!(state, GateState::Granted(_)), "{user:?} {expiry:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_hand_written_expired_session_is_cleared() {
        let now = Utc::now();
        let storage = raw_storage(Some(r#"{"role":"admin"}"#), Some(now - TimeDelta::hours(1)));

        evaluate(&storage, now).await;
        assert!(!storage.contains(session_keys::USER));
        assert!(!storage.contains(session_keys::AUTH_TOKEN));
    }

    #[tokio::test]
    async fn test_hand_written_admin_is_granted_with_its_record() {
        let now = Utc::now();
        let storage = raw_storage(Some(r#"{"role":"admin"}"#), Some(now + TimeDelta::hours(1)));

        let GateState::Granted(user) = evaluate(&storage, now).await else {
            panic!("admin record was not granted");
        };
        assert!(user.is_admin());
        assert_eq!(user.id, None);
        assert!(storage.contains(session_keys::USER));
    }

    #[test]
    fn test_reason_query_values() {
        let parsed: DenialReason = serde_json::from_str("\"session_expired\"").unwrap();
        assert_eq!(parsed, DenialReason::SessionExpired);
        assert_eq!(
            DenialReason::InsufficientPermissions.to_string(),
            "insufficient_permissions"
        );
        assert_eq!(DenialReason::AuthenticationRequired.message(), "Authentication required");
    }
}
