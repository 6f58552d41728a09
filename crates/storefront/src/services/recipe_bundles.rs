//! Recipe bundle service: queries, admin mutations, and component editing.

use std::collections::BTreeMap;

use bazaar_core::{BundleId, BundleStatus, ProductId};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use super::{CatalogError, Repository, ensure_admin};
use crate::models::recipe_bundle::DEFAULT_UNIT;
use crate::models::{BundleAnalytics, BundleComponent, ComponentUpdate, Patch, Product, RecipeBundle};
use crate::session::SessionContext;

pub const DEFAULT_FEATURED_LIMIT: usize = 6;
pub const DEFAULT_CATEGORY_LIMIT: usize = 12;
pub const DEFAULT_TIME_LIMIT: usize = 8;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct RecipeBundleService {
    repo: Repository<RecipeBundle>,
}

impl RecipeBundleService {
    #[must_use]
    pub fn new(bundles: Vec<RecipeBundle>) -> Self {
        Self {
            repo: Repository::new(bundles),
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
    pub fn all(&self) -> Vec<RecipeBundle> {
        self.repo.all()
    }

    #[must_use]
    pub fn get(&self, id: BundleId) -> Option<RecipeBundle> {
        self.repo.get(id)
    }

    /// Bundles flagged as featured, regardless of status.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<RecipeBundle> {
        self.repo.filter(limit, |b| b.featured)
    }

    /// Bundles whose category equals `category`, ignoring case.
    #[must_use]
    pub fn by_category(&self, category: &str, limit: usize) -> Vec<RecipeBundle> {
        let wanted = category.to_lowercase();
        self.repo
            .filter(limit, |b| b.category.to_lowercase() == wanted)
    }

    /// Bundles that can be prepared within `max_minutes`.
    #[must_use]
    pub fn by_time(&self, max_minutes: u32, limit: usize) -> Vec<RecipeBundle> {
        self.repo.filter(limit, |b| b.prep_time <= max_minutes)
    }

    /// Bundles whose name, description, or cuisine contains `query`.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<RecipeBundle> {
        self.repo.search(query, limit)
    }

    /// Add a bundle. New bundles start active with no components unless
    /// components are supplied.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::InvalidPayload`].
    #[instrument(skip(self, ctx, fields))]
    pub fn admin_create(&mut self, ctx: &SessionContext, mut fields: Patch) -> Result<RecipeBundle, CatalogError> {
        ensure_admin(ctx, "bundle creation")?;
        fields
            .entry("components")
            .or_insert_with(|| Value::Array(Vec::new()));
        fields.insert(
            "status".to_owned(),
            Value::String(BundleStatus::Active.as_str().to_owned()),
        );

        let bundle = self.repo.insert(fields, Utc::now())?;
        info!(id = %bundle.id, name = %bundle.name, "Bundle created");
        Ok(bundle)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`], [`CatalogError::NotFound`], or
    /// [`CatalogError::InvalidPayload`].
    #[instrument(skip(self, ctx, patch))]
    pub fn admin_update(
        &mut self,
        ctx: &SessionContext,
        id: BundleId,
        patch: &Patch,
    ) -> Result<RecipeBundle, CatalogError> {
        ensure_admin(ctx, "bundle updates")?;
        let bundle = self.repo.update(id, patch, Utc::now())?;
        info!(%id, "Bundle updated");
        Ok(bundle)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] or [`CatalogError::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn admin_delete(&mut self, ctx: &SessionContext, id: BundleId) -> Result<RecipeBundle, CatalogError> {
        ensure_admin(ctx, "bundle deletion")?;
        let bundle = self.repo.remove(id)?;
        info!(%id, "Bundle deleted");
        Ok(bundle)
    }

    /// Set `status` on every listed bundle. Unknown ids are skipped; the
    /// updated bundles are returned in input order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] for non-admins.
    #[instrument(skip(self, ctx, ids), fields(count = ids.len()))]
    pub fn admin_bulk_status_update(
        &mut self,
        ctx: &SessionContext,
        ids: &[BundleId],
        status: BundleStatus,
    ) -> Result<Vec<RecipeBundle>, CatalogError> {
        ensure_admin(ctx, "bulk operations")?;
        let now = Utc::now();

        let updated: Vec<_> = ids
            .iter()
            .filter_map(|&id| self.repo.modify(id, now, |b| b.status = status).ok())
            .collect();

        info!(updated = updated.len(), "Bulk status update complete");
        Ok(updated)
    }

    /// Counts and average rating across every bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AccessDenied`] for non-admins.
    pub fn admin_analytics(&self, ctx: &SessionContext) -> Result<BundleAnalytics, CatalogError> {
        ensure_admin(ctx, "analytics")?;
        let bundles = self.repo.as_slice();

        let mut category_counts = BTreeMap::new();
        for bundle in bundles {
            *category_counts.entry(bundle.category.clone()).or_insert(0) += 1;
        }

        let rating_sum: f64 = bundles.iter().map(|b| b.rating.unwrap_or(0.0)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_rating = if bundles.is_empty() {
            0.0
        } else {
            rating_sum / bundles.len() as f64
        };

        Ok(BundleAnalytics {
            total_bundles: bundles.len(),
            active_bundles: bundles
                .iter()
                .filter(|b| b.status == BundleStatus::Active)
                .count(),
            featured_bundles: bundles.iter().filter(|b| b.featured).count(),
            average_rating,
            category_counts,
        })
    }

    /// Append `product` to a bundle's components.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the bundle does not exist, or
    /// [`CatalogError::IdsExhausted`] if it already holds component `i32::MAX`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_component(
        &mut self,
        bundle_id: BundleId,
        product: Product,
        quantity: f64,
        unit: Option<&str>,
    ) -> Result<RecipeBundle, CatalogError> {
        let component_id = self
            .repo
            .as_slice()
            .iter()
            .find(|bundle| bundle.id == bundle_id)
            .ok_or_else(|| CatalogError::not_found::<RecipeBundle>(bundle_id))?
            .next_component_id()
            .ok_or(CatalogError::IdsExhausted { entity: "Component" })?;

        let now = Utc::now();
        let unit = unit.unwrap_or(DEFAULT_UNIT).to_owned();
        self.repo.modify(bundle_id, now, |bundle| {
            let component = BundleComponent {
                id: component_id,
                product,
                quantity,
                unit,
                added_at: now,
                updated_at: None,
            };
            bundle.components.push(component);
        })
    }

    /// Drop every component holding `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the bundle does not exist.
    #[instrument(skip(self))]
    pub fn remove_component(
        &mut self,
        bundle_id: BundleId,
        product_id: ProductId,
    ) -> Result<RecipeBundle, CatalogError> {
        self.repo.modify(bundle_id, Utc::now(), |bundle| {
            bundle.components.retain(|c| c.product.id != product_id);
        })
    }

    /// Change the quantity or unit of the component holding `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the bundle does not exist.
    #[instrument(skip(self, update))]
    pub fn update_component(
        &mut self,
        bundle_id: BundleId,
        product_id: ProductId,
        update: &ComponentUpdate,
    ) -> Result<RecipeBundle, CatalogError> {
        let now = Utc::now();
        self.repo.modify(bundle_id, now, |bundle| {
            let Some(component) = bundle
                .component_position(product_id)
                .and_then(|index| bundle.components.get_mut(index))
            else {
                return;
            };
            if let Some(quantity) = update.quantity {
                component.quantity = quantity;
            }
            if let Some(unit) = &update.unit {
                component.unit.clone_from(unit);
            }
            component.updated_at = Some(now);
        })
    }
}
