//! Product catalog service.

use bazaar_core::ProductId;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::trending::{self, LocationContext};
use super::{CatalogError, Repository, ensure_admin};
use crate::models::{ID_FIELD, Patch, Product};
use crate::session::SessionContext;

/// Default result cap for [`ProductService::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Default result cap for [`ProductService::trending_by_location`].
pub const DEFAULT_TRENDING_LIMIT: usize = 8;

/// Default threshold for [`ProductService::admin_low_stock_items`].
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Reads, recommendations, and admin mutations over products.
#[derive(Debug, Clone)]
pub struct ProductService {
    repo: Repository<Product>,
}

impl ProductService {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            repo: Repository::new(products),
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

    /// Every product in catalog order.
    #[must_use]
    pub fn all(&self) -> Vec<Product> {
        self.repo.all()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.repo.get(id)
    }

    /// Products whose name or description contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<Product> {
        self.repo.search(query, limit)
    }

    /// Recommendations for a shopper's location and weather.
    #[instrument(skip(self))]
    pub fn trending_by_location(&self, location: Option<&LocationContext>, limit: usize) -> Vec<Product> {
        trending::rank(self.repo.as_slice(), location, limit)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] for non-admins or
    /// [`CatalogError::InvalidPayload`] if `fields` do not form a product.
    #[instrument(skip(self, ctx, fields))]
    pub fn admin_create(&mut self, ctx: &SessionContext, fields: Patch) -> Result<Product, CatalogError> {
        ensure_admin(ctx, "product creation")?;
        let product = self.repo.insert(fields, Utc::now())?;
        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Merge `patch` into the product with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`], [`CatalogError::NotFound`], or
    /// [`CatalogError::InvalidPayload`].
    #[instrument(skip(self, ctx, patch))]
    pub fn admin_update(
        &mut self,
        ctx: &SessionContext,
        id: ProductId,
        patch: &Patch,
    ) -> Result<Product, CatalogError> {
        ensure_admin(ctx, "product updates")?;
        let product = self.repo.update(id, patch, Utc::now())?;
        info!(%id, "Product updated");
        Ok(product)
    }

    /// Remove the product with `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn admin_delete(&mut self, ctx: &SessionContext, id: ProductId) -> Result<Product, CatalogError> {
        ensure_admin(ctx, "product deletion")?;
        let product = self.repo.remove(id)?;
        info!(%id, "Product deleted");
        Ok(product)
    }

    /// Apply several patches, each naming its product in an `Id` field.
    ///
    /// Entries without a usable `Id`, for unknown products, or that would
    /// produce an invalid product are skipped. Returns the updated products in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] for non-admins.
    #[instrument(skip(self, ctx, updates), fields(count = updates.len()))]
    pub fn admin_bulk_update(
        &mut self,
        ctx: &SessionContext,
        updates: &[Patch],
    ) -> Result<Vec<Product>, CatalogError> {
        ensure_admin(ctx, "bulk operations")?;
        let now = Utc::now();

        let mut applied = Vec::with_capacity(updates.len());
        for patch in updates {
            let Some(id) = patch_id(patch) else {
                debug!("Skipping bulk entry without Id");
                continue;
            };
            match self.repo.update(id, patch, now) {
                Ok(product) => applied.push(product),
                Err(e) => debug!(%id, error = %e, "Skipping bulk entry"),
            }
        }

        info!(applied = applied.len(), "Bulk product update complete");
        Ok(applied)
    }

    /// Set the stock level of one product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn admin_update_stock(
        &mut self,
        ctx: &SessionContext,
        id: ProductId,
        stock: u32,
    ) -> Result<Product, CatalogError> {
        ensure_admin(ctx, "stock management")?;
        let product = self.repo.modify(id, Utc::now(), |p| p.stock = Some(stock))?;
        info!(%id, stock, "Stock updated");
        Ok(product)
    }

    /// Products with tracked, non-zero stock below `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] for non-admins.
    pub fn admin_low_stock_items(
        &self,
        ctx: &SessionContext,
        threshold: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        ensure_admin(ctx, "inventory reports")?;
        Ok(self.repo.filter(usize::MAX, |p| p.is_low_stock(threshold)))
    }
}

fn patch_id(patch: &Patch) -> Option<ProductId> {
    patch
        .get(ID_FIELD)
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .map(ProductId::new)
}
