//! Category catalog service.

use bazaar_core::CategoryId;
use chrono::Utc;
use tracing::{info, instrument};

use super::{CatalogError, Repository, ensure_admin};
use crate::models::{Category, Patch};
use crate::session::SessionContext;

#[derive(Debug, Clone)]
pub struct CategoryService {
    repo: Repository<Category>,
}

impl CategoryService {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            repo: Repository::new(categories),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    #[must_use]
    pub fn all(&self) -> Vec<Category> {
        self.repo.all()
    }

    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<Category> {
        self.repo.get(id)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::InvalidPayload`].
    #[instrument(skip(self, ctx, fields))]
    pub fn admin_create(&mut self, ctx: &SessionContext, fields: Patch) -> Result<Category, CatalogError> {
        ensure_admin(ctx, "category creation")?;
        let category = self.repo.insert(fields, Utc::now())?;
        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`], [`CatalogError::NotFound`], or
    /// [`CatalogError::InvalidPayload`].
    #[instrument(skip(self, ctx, patch))]
    pub fn admin_update(
        &mut self,
        ctx: &SessionContext,
        id: CategoryId,
        patch: &Patch,
    ) -> Result<Category, CatalogError> {
        ensure_admin(ctx, "category updates")?;
        let category = self.repo.update(id, patch, Utc::now())?;
        info!(%id, "Category updated");
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn admin_delete(&mut self, ctx: &SessionContext, id: CategoryId) -> Result<Category, CatalogError> {
        ensure_admin(ctx, "category deletion")?;
        let category = self.repo.remove(id)?;
        info!(%id, "Category deleted");
        Ok(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::Fixtures;
    use crate::services::test_support::{admin, patch, shopper};

    fn service() -> CategoryService {
        CategoryService::new(Fixtures::embedded().unwrap().categories)
    }

    #[test]
    fn test_reads() {
        let service = service();
        assert_eq!(service.all().len(), 6);
        assert_eq!(service.get(CategoryId::new(4)).unwrap().name, "Beverages");
        assert!(service.get(CategoryId::new(40)).is_none());
    }

    #[test]
    fn test_admin_lifecycle() {
        let mut service = service();
        let created = service
            .admin_create(&admin(), patch(json!({ "name": "Bakery", "icon": "Croissant" })))
            .unwrap();
        assert_eq!(created.id, CategoryId::new(7));

        let updated = service
            .admin_update(&admin(), created.id, &patch(json!({ "description": "Fresh naan" })))
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Fresh naan"));
        assert_eq!(updated.extra.get("icon"), Some(&json!("Croissant")));

        service.admin_delete(&admin(), created.id).unwrap();
        assert_eq!(service.len(), 6);
    }

    #[test]
    fn test_shopper_cannot_delete() {
        let mut service = service();
        let err = service
            .admin_delete(&shopper(), CategoryId::new(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Admin access required for category deletion");
        assert_eq!(service.len(), 6);
    }
}
