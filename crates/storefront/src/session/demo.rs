//! Demo session controls offered on the unauthorized page.
//!
//! These write a self-made session straight into client storage, which is
//! exactly why the admin gate is a UI gate and not a security boundary.

use bazaar_core::{Email, Role, UserId};
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use super::storage::{ClientStorage, StorageError, clear_session, write_record};
use crate::models::{AuthToken, StoredUser, session_keys};

/// Email of the simulated administrator.
pub const DEMO_ADMIN_EMAIL: &str = "admin@bazaarpk.com";

/// Email of the simulated shopper.
pub const DEMO_USER_EMAIL: &str = "user@example.com";

/// Store a demo admin user and a token valid for `ttl`.
///
/// # Errors
///
/// Returns an error if the expiry overflows or the storage backend rejects
/// the write.
pub async fn simulate_admin_access<S: ClientStorage>(
    storage: &S,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<StoredUser, StorageError> {
    let user = StoredUser::new(
        UserId::new(1),
        "Administrator",
        Email::parse(DEMO_ADMIN_EMAIL)?,
        Role::Admin,
    );
    write_session(storage, &user, now, ttl).await?;
    info!(user_id = ?user.id, "Demo admin session created");
    Ok(user)
}

/// Store a demo regular user and a token valid for `ttl`.
///
/// # Errors
///
/// Returns an error if the expiry overflows or the storage backend rejects
/// the write.
pub async fn login_as_regular_user<S: ClientStorage>(
    storage: &S,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<StoredUser, StorageError> {
    let user = StoredUser::new(
        UserId::new(2),
        "Regular User",
        Email::parse(DEMO_USER_EMAIL)?,
        Role::User,
    );
    write_session(storage, &user, now, ttl).await?;
    info!(user_id = ?user.id, "Demo user session created");
    Ok(user)
}

/// Remove the stored user and token.
///
/// # Errors
///
/// Returns an error if the storage backend rejects the removal.
pub async fn logout<S: ClientStorage>(storage: &S) -> Result<(), StorageError> {
    clear_session(storage).await?;
    info!("Session cleared");
    Ok(())
}

async fn write_session<S: ClientStorage>(
    storage: &S,
    user: &StoredUser,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Result<(), StorageError> {
    let expiry = now
        .checked_add_signed(ttl)
        .ok_or(StorageError::ExpiryOutOfRange)?;
    let token = AuthToken {
        token: Uuid::new_v4().simple().to_string(),
        issued: Some(now),
        expiry,
        role: Some(user.role.clone()),
        user_id: user.id,
    };
    write_record(storage, session_keys::USER, user).await?;
    write_record(storage, session_keys::AUTH_TOKEN, &token).await
}
