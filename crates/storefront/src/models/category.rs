//! Category record.

use bazaar_core::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Patch};

/// A product category as loaded from `categories.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "Id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Patch,
}

impl Entity for Category {
    type Id = CategoryId;

    const NAME: &'static str = "Category";

    fn id(&self) -> CategoryId {
        self.id
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}
