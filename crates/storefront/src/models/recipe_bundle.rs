//! Recipe bundle records: a recipe plus the products needed to cook it.

use std::collections::BTreeMap;

use bazaar_core::{BundleId, BundleStatus, ComponentId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Patch, Product, Searchable};

/// Unit used when a component is added without one.
pub const DEFAULT_UNIT: &str = "pc";

/// A recipe bundle as loaded from `recipeBundles.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeBundle {
    #[serde(rename = "Id")]
    pub id: BundleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub category: String,
    /// Preparation time in minutes.
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub components: Vec<BundleComponent>,
    #[serde(default)]
    pub status: BundleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Patch,
}

/// One product line inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleComponent {
    pub id: ComponentId,
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    pub quantity: f64,
    pub unit: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update for a bundle component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentUpdate {
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Admin summary over all bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAnalytics {
    pub total_bundles: usize,
    pub active_bundles: usize,
    pub featured_bundles: usize,
    /// Mean rating across all bundles, unrated counting as zero.
    pub average_rating: f64,
    pub category_counts: BTreeMap<String, usize>,
}

impl RecipeBundle {
    /// Index of the component holding `product_id`.
    #[must_use]
    pub fn component_position(&self, product_id: ProductId) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.product.id == product_id)
    }

    /// Next free component id within this bundle.
    #[must_use]
    pub fn next_component_id(&self) -> Option<ComponentId> {
        self.components
            .iter()
            .map(|c| c.id)
            .max()
            .map_or(Some(ComponentId::new(1)), |id| id.next())
    }
}

impl Entity for RecipeBundle {
    type Id = BundleId;

    const NAME: &'static str = "Bundle";

    fn id(&self) -> BundleId {
        self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Searchable for RecipeBundle {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.cuisine.as_str(),
        ]
    }
}
