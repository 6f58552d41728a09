//! Catalog services over the fixture data.
//!
//! # Services
//!
//! - `products` - product reads, trending recommendations, admin mutations
//! - `categories` - category reads and admin mutations
//! - `recipe_bundles` - bundle queries, component editing, admin mutations
//!
//! Each service owns a [`Repository`] seeded from [`Fixtures`]. Admin
//! operations take the caller's [`SessionContext`] and fail with
//! [`CatalogError::AccessDenied`] before touching any data when the stored
//! user is not an admin.

pub mod categories;
pub mod products;
pub mod recipe_bundles;
pub mod repository;
pub mod trending;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::fixtures::Fixtures;
use crate::models::Entity;
use crate::session::SessionContext;

pub use categories::CategoryService;
pub use products::ProductService;
pub use recipe_bundles::RecipeBundleService;
pub use repository::Repository;
pub use trending::LocationContext;

/// Errors raised by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller's session user is not an admin.
    #[error("Admin access required for {action}")]
    AccessDenied { action: &'static str },

    /// No record with the requested id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i32 },

    /// Payload or merged record failed to deserialize.
    #[error("Invalid {entity} data: {source}")]
    InvalidPayload {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Every id up to `i32::MAX` has been allocated.
    #[error("No {entity} ids left to allocate")]
    IdsExhausted { entity: &'static str },
}

impl CatalogError {
    pub(crate) fn not_found<E: Entity>(id: E::Id) -> Self {
        Self::NotFound {
            entity: E::NAME,
            id: id.into(),
        }
    }

    pub(crate) fn invalid<E: Entity>(message: &str) -> Self {
        Self::InvalidPayload {
            entity: E::NAME,
            source: serde::de::Error::custom(message),
        }
    }
}

/// Reject the call unless the session user is an admin.
///
/// # Errors
///
/// Returns [`CatalogError::AccessDenied`] naming `action`.
pub fn ensure_admin(ctx: &SessionContext, action: &'static str) -> Result<(), CatalogError> {
    if ctx.verify_admin_access() {
        Ok(())
    } else {
        warn!(action, "Admin operation rejected");
        Err(CatalogError::AccessDenied { action })
    }
}

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_categories: usize,
    pub total_bundles: usize,
}

/// All three catalog services, seeded from one fixture set.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: ProductService,
    pub categories: CategoryService,
    pub bundles: RecipeBundleService,
}

impl Catalog {
    #[must_use]
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            products: ProductService::new(fixtures.products),
            categories: CategoryService::new(fixtures.categories),
            bundles: RecipeBundleService::new(fixtures.bundles),
        }
    }

    #[must_use]
    pub fn dashboard_summary(&self) -> DashboardSummary {
        DashboardSummary {
            total_products: self.products.len(),
            total_categories: self.categories.len(),
            total_bundles: self.bundles.len(),
        }
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::{admin, shopper};
    use super::*;

    #[test]
    fn test_ensure_admin() {
        assert!(ensure_admin(&admin(), "testing").is_ok());

        let err = ensure_admin(&shopper(), "testing").unwrap_err();
        assert_eq!(err.to_string(), "Admin access required for testing");

        let err = ensure_admin(&SessionContext::anonymous(), "testing").unwrap_err();
        assert!(matches!(err, CatalogError::AccessDenied { action: "testing" }));
    }

    #[test]
    fn test_dashboard_summary_counts_embedded_fixtures() {
        let catalog = Catalog::new(Fixtures::embedded().unwrap());
        let summary = catalog.dashboard_summary();

        assert_eq!(summary.total_products, 19);
        assert_eq!(summary.total_categories, 6);
        assert_eq!(summary.total_bundles, 7);
    }
}
