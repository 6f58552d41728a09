//! Generic in-memory repository shared by the catalog services.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::CatalogError;
use crate::models::{Entity, ID_FIELD, Patch, Searchable};

/// Owned collection of one entity type plus its id allocator.
///
/// Records keep fixture order; new records are appended. The allocator starts
/// at `max(Id) + 1` and only moves forward, so deleted ids are never reused.
/// Once `i32::MAX` has been handed out, further inserts fail.
#[derive(Debug, Clone)]
pub struct Repository<E: Entity> {
    items: Vec<E>,
    next_id: Option<i32>,
}

impl<E: Entity> Repository<E> {
    /// Build a repository over fixture records.
    #[must_use]
    pub fn new(items: Vec<E>) -> Self {
        let next_id = items
            .iter()
            .map(|item| item.id().into())
            .max()
            .map_or(Some(1), |max: i32| max.checked_add(1));
        Self { items, next_id }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow all records in order.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// Copy of every record.
    #[must_use]
    pub fn all(&self) -> Vec<E> {
        self.items.clone()
    }

    /// Id the next insert will receive, if any are left.
    #[must_use]
    pub fn next_id(&self) -> Option<E::Id> {
        self.next_id.map(E::Id::from)
    }

    /// Copy of the record with `id`.
    #[must_use]
    pub fn get(&self, id: E::Id) -> Option<E> {
        self.items.iter().find(|item| item.id() == id).cloned()
    }

    /// First `limit` records matching `predicate`.
    pub fn filter<P>(&self, limit: usize, mut predicate: P) -> Vec<E>
    where
        P: FnMut(&E) -> bool,
    {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over the record's search fields.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<E>
    where
        E: Searchable,
    {
        let needle = query.to_lowercase();
        self.filter(limit, |item| item.matches_lowercase(&needle))
    }

    /// Create a record from loose fields.
    ///
    /// The allocated id replaces any `Id` in `fields`; `createdAt` and
    /// `updatedAt` are stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPayload`] if the fields do not form a
    /// valid record, or [`CatalogError::IdsExhausted`] once the id space is
    /// used up. The allocator does not advance in either case.
    pub fn insert(&mut self, mut fields: Patch, now: DateTime<Utc>) -> Result<E, CatalogError> {
        let id = self
            .next_id
            .ok_or(CatalogError::IdsExhausted { entity: E::NAME })?;
        let stamp = Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        fields.insert(ID_FIELD.to_owned(), Value::from(id));
        fields.insert("createdAt".to_owned(), stamp.clone());
        fields.insert("updatedAt".to_owned(), stamp);

        let record: E = decode(fields)?;
        self.next_id = id.checked_add(1);
        self.items.push(record.clone());
        Ok(record)
    }

    /// Shallow-merge `patch` over the record with `id`.
    ///
    /// An `Id` key in the patch is ignored. The stored record is replaced only
    /// if the merged result is valid.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no record has `id`, or
    /// [`CatalogError::InvalidPayload`] if the merge produces an invalid record.
    pub fn update(&mut self, id: E::Id, patch: &Patch, now: DateTime<Utc>) -> Result<E, CatalogError> {
        let slot = self.slot_mut(id)?;

        let mut merged = match serde_json::to_value(&*slot) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(CatalogError::invalid::<E>(
                    "record did not serialize to an object",
                ));
            }
            Err(source) => {
                return Err(CatalogError::InvalidPayload {
                    entity: E::NAME,
                    source,
                });
            }
        };
        for (key, value) in patch {
            if key != ID_FIELD {
                merged.insert(key.clone(), value.clone());
            }
        }

        let mut record: E = decode(merged)?;
        record.set_updated_at(now);
        *slot = record.clone();
        Ok(record)
    }

    /// Apply an in-place change to the record with `id` and stamp it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no record has `id`.
    pub fn modify<F>(&mut self, id: E::Id, now: DateTime<Utc>, change: F) -> Result<E, CatalogError>
    where
        F: FnOnce(&mut E),
    {
        let slot = self.slot_mut(id)?;
        change(slot);
        slot.set_updated_at(now);
        Ok(slot.clone())
    }

    /// Remove and return the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no record has `id`.
    pub fn remove(&mut self, id: E::Id) -> Result<E, CatalogError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| CatalogError::not_found::<E>(id))?;
        Ok(self.items.remove(index))
    }

    fn slot_mut(&mut self, id: E::Id) -> Result<&mut E, CatalogError> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| CatalogError::not_found::<E>(id))
    }
}

fn decode<E: Entity>(fields: Patch) -> Result<E, CatalogError> {
    serde_json::from_value(Value::Object(fields)).map_err(|source| CatalogError::InvalidPayload {
        entity: E::NAME,
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::CategoryId;
    use serde_json::json;

    use super::*;
    use crate::models::Category;

    fn patch(value: serde_json::Value) -> Patch {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn repo() -> Repository<Category> {
        Repository::new(
            serde_json::from_value(json!([
                { "Id": 4, "name": "Dairy" },
                { "Id": 9, "name": "Snacks", "icon": "Cookie" }
            ]))
            .unwrap(),
        )
    }

    #[test]
    fn test_allocator_starts_after_max_id() {
        assert_eq!(repo().next_id(), Some(CategoryId::new(10)));
        assert_eq!(
            Repository::<Category>::new(Vec::new()).next_id(),
            Some(CategoryId::new(1))
        );
    }

    #[test]
    fn test_insert_ignores_supplied_id_and_stamps_times() {
        let mut repo = repo();
        let created = repo
            .insert(patch(json!({ "Id": 4, "name": "Bakery" })), Utc::now())
            .unwrap();

        assert_eq!(created.id, CategoryId::new(10));
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(repo.get(CategoryId::new(10)), Some(created));
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_invalid_insert_does_not_advance_allocator() {
        let mut repo = repo();
        let err = repo
            .insert(patch(json!({ "description": "no name" })), Utc::now())
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidPayload { entity: "Category", .. }));
        assert_eq!(repo.next_id(), Some(CategoryId::new(10)));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_exhausted_id_space_fails_instead_of_reusing() {
        let mut repo: Repository<Category> = Repository::new(
            serde_json::from_value(json!([{ "Id": i32::MAX, "name": "Last" }])).unwrap(),
        );
        assert_eq!(repo.next_id(), None);

        let err = repo
            .insert(patch(json!({ "name": "Overflow" })), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CatalogError::IdsExhausted { entity: "Category" }));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_last_id_is_handed_out_once() {
        let mut repo: Repository<Category> = Repository::new(
            serde_json::from_value(json!([{ "Id": i32::MAX - 1, "name": "Penultimate" }])).unwrap(),
        );
        let created = repo
            .insert(patch(json!({ "name": "Last" })), Utc::now())
            .unwrap();
        assert_eq!(created.id, CategoryId::new(i32::MAX));
        assert!(repo.insert(patch(json!({ "name": "Again" })), Utc::now()).is_err());
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let mut repo = repo();
        repo.remove(CategoryId::new(9)).unwrap();
        let created = repo
            .insert(patch(json!({ "name": "Frozen" })), Utc::now())
            .unwrap();
        assert_eq!(created.id, CategoryId::new(10));
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let mut repo = repo();
        let updated = repo
            .update(
                CategoryId::new(9),
                &patch(json!({ "Id": 100, "name": "Namkeen" })),
                Utc::now(),
            )
            .unwrap();

        assert_eq!(updated.id, CategoryId::new(9));
        assert_eq!(updated.name, "Namkeen");
        assert_eq!(updated.extra.get("icon"), Some(&json!("Cookie")));
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_invalid_update_leaves_record_untouched() {
        let mut repo = repo();
        let before = repo.get(CategoryId::new(4)).unwrap();
        let err = repo
            .update(CategoryId::new(4), &patch(json!({ "name": 12 })), Utc::now())
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidPayload { .. }));
        assert_eq!(repo.get(CategoryId::new(4)), Some(before));
    }

    #[test]
    fn test_missing_ids_report_not_found() {
        let mut repo = repo();
        let err = repo.remove(CategoryId::new(77)).unwrap_err();
        assert_eq!(err.to_string(), "Category not found: 77");
        assert_eq!(repo.len(), 2);

        let err = repo
            .modify(CategoryId::new(77), Utc::now(), |_| {})
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { id: 77, .. }));
    }

    #[test]
    fn test_filter_respects_limit_and_order() {
        let repo = repo();
        let names: Vec<_> = repo.filter(1, |_| true).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Dairy"]);
        assert!(repo.filter(0, |_| true).is_empty());
    }
}
