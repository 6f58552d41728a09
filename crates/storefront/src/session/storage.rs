//! Key-value client storage.
//!
//! Values are JSON-encoded strings, matching what a browser keeps in local
//! storage. The HTTP layer uses the per-client `tower_sessions::Session`;
//! tests and the CLI use [`MemoryStorage`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store failed.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A record could not be encoded.
    #[error("failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),

    /// `now + ttl` falls outside the representable date range.
    #[error("session expiry out of range")]
    ExpiryOutOfRange,

    /// A demo record carried an invalid email.
    #[error("invalid session email: {0}")]
    InvalidEmail(#[from] bazaar_core::EmailError),
}

/// String key-value storage owned by one client.
pub trait ClientStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Serialize `record` to JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if encoding fails or the backend rejects the write.
pub async fn write_record<S, T>(storage: &S, key: &str, record: &T) -> Result<(), StorageError>
where
    S: ClientStorage,
    T: Serialize + Sync,
{
    let raw = serde_json::to_string(record)?;
    storage.set_item(key, raw).await
}

/// Remove both session records (user and token).
///
/// # Errors
///
/// Returns an error if the backend rejects either removal.
pub async fn clear_session<S: ClientStorage>(storage: &S) -> Result<(), StorageError> {
    storage.remove_item(session_keys::USER).await?;
    storage.remove_item(session_keys::AUTH_TOKEN).await
}

/// In-process storage, one map per instance.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with raw values.
    #[must_use]
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: Mutex::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Whether a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClientStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

impl ClientStorage for Session {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get::<String>(key).await?)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.insert(key, value).await?)
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.remove::<String>(key).await?;
        Ok(())
    }
}
