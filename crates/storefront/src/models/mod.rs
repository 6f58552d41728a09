//! Domain models for the storefront catalog and the client session.
//!
//! Catalog records mirror the fixture JSON: identity lives in an `Id` field,
//! other keys are `camelCase`, and any key the model does not know about is
//! kept in `extra` so it survives a load/update/serialize cycle.

pub mod category;
pub mod product;
pub mod recipe_bundle;
pub mod session;
pub mod user;

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use category::Category;
pub use product::Product;
pub use recipe_bundle::{BundleAnalytics, BundleComponent, ComponentUpdate, RecipeBundle};
pub use session::{AuthToken, keys as session_keys};
pub use user::StoredUser;

/// Loosely typed field map used for create payloads and partial updates.
pub type Patch = serde_json::Map<String, serde_json::Value>;

/// Name of the identity field in fixture and API payloads.
pub const ID_FIELD: &str = "Id";

/// A record held by a catalog repository.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Typed identity of the record.
    type Id: Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug + From<i32> + Into<i32>;

    /// Human-readable entity name used in error messages ("Product", ...).
    const NAME: &'static str;

    /// The record's identity.
    fn id(&self) -> Self::Id;

    /// Record a modification time.
    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

/// A record that supports case-insensitive substring search.
pub trait Searchable {
    /// Text fields matched by `search`, in priority order.
    fn search_fields(&self) -> Vec<&str>;

    /// Whether any search field contains `needle`, which must already be
    /// lowercased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}
