//! Product record.

use bazaar_core::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Patch, Searchable};

/// A catalog product as loaded from `products.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "Id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Units on hand, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Merchandising labels such as "Bestseller" or "Trending".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Fixture fields without a dedicated model field (price, category, ...).
    #[serde(flatten)]
    pub extra: Patch,
}

impl Product {
    /// Case-insensitive badge check.
    #[must_use]
    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges
            .iter()
            .any(|b| b.eq_ignore_ascii_case(badge))
    }

    /// Rating used for ordering; unrated products sort as zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Whether stock is tracked, non-zero, and below `threshold`.
    #[must_use]
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        matches!(self.stock, Some(stock) if stock > 0 && stock < threshold)
    }
}

impl Entity for Product {
    type Id = ProductId;

    const NAME: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let p = product(json!({
            "Id": 3,
            "name": "Tomatoes",
            "description": "Firm",
            "price": 180,
            "category": "Fresh Produce"
        }));

        assert_eq!(p.extra.get("price"), Some(&json!(180)));
        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["Id"], json!(3));
        assert_eq!(back["category"], json!("Fresh Produce"));
        assert!(back.get("stock").is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let p = product(json!({ "Id": 1, "name": "Milk" }));
        assert_eq!(p.description, "");
        assert!(p.badges.is_empty());
        assert!(p.stock.is_none());
        assert!((p.rating_or_zero() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_has_badge_ignores_case() {
        let p = product(json!({ "Id": 1, "name": "Tea", "badges": ["BestSeller"] }));
        assert!(p.has_badge("bestseller"));
        assert!(!p.has_badge("trending"));
    }

    #[test]
    fn test_low_stock_excludes_zero_and_untracked() {
        let low = product(json!({ "Id": 1, "name": "A", "stock": 3 }));
        let empty = product(json!({ "Id": 2, "name": "B", "stock": 0 }));
        let untracked = product(json!({ "Id": 3, "name": "C" }));
        let plenty = product(json!({ "Id": 4, "name": "D", "stock": 10 }));

        assert!(low.is_low_stock(10));
        assert!(!empty.is_low_stock(10));
        assert!(!untracked.is_low_stock(10));
        assert!(!plenty.is_low_stock(10));
    }
}
