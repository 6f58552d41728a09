//! Application state shared across handlers.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::gate::AdminGate;
use crate::services::Catalog;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog sits behind one
/// lock so admin writes are serialized and ids are never handed out twice.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: RwLock<Catalog>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: RwLock::new(catalog),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// A fresh admin gate using the configured delay.
    #[must_use]
    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(self.inner.config.gate_delay)
    }

    /// Shared access to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a writer panicked while holding the lock.
    pub fn catalog(&self) -> Result<RwLockReadGuard<'_, Catalog>, AppError> {
        self.inner
            .catalog
            .read()
            .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))
    }

    /// Exclusive access to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a writer panicked while holding the lock.
    pub fn catalog_mut(&self) -> Result<RwLockWriteGuard<'_, Catalog>, AppError> {
        self.inner
            .catalog
            .write()
            .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))
    }
}
