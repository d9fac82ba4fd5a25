use crate::collection::{Document, FindOptions, RecordId};
use crate::common::{LockHandle, SortOrder, Value, DOC_ID};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::filter::{Filter, FilterProvider};
use crate::schema::Schema;
use crate::store::{RecordMap, RecordMapProvider, RecordStore, RecordStoreProvider};
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use itertools::Itertools;
use std::sync::Arc;

/// A collection of records with schema enforcement.
///
/// `RecordCollection` performs document-level CRUD against a named record
/// map and enforces the collection's [Schema] on every write: required
/// fields, bounded values, and unique fields (through unique indexes kept
/// alongside the primary map). Every operation is a single atomic
/// request/response; writes are serialised by a collection-wide write lock.
///
/// Record ids are assigned by the collection on insert and are immutable:
/// inserting a document that already carries an `_id` fails, and updates
/// that try to rewrite `_id` fail.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::collection::RecordCollection;
/// use persondb::filter::field;
/// use persondb::schema::Schema;
/// use persondb::store::RecordStore;
/// use persondb::doc;
///
/// let store = RecordStore::connect("memory://demo")?;
/// let schema = Schema::new().required("name").unique("name");
/// let collection = RecordCollection::open(&store, "people", schema)?;
///
/// let stored = collection.insert(doc! { name: "Alice" })?;
/// let found = collection.find(field("name").eq("Alice"))?;
/// ```
#[derive(Clone)]
pub struct RecordCollection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    primary: RecordMap,
    schema: Schema,
    unique_indexes: DashMap<String, SkipMap<Value, RecordId>>,
    write_lock: LockHandle,
}

impl RecordCollection {
    /// Opens the named collection in the given store, installing the schema.
    ///
    /// Unique indexes are rebuilt from the records already present in the
    /// store, so reopening a collection re-establishes its constraints.
    pub fn open(store: &RecordStore, name: &str, schema: Schema) -> StoreResult<RecordCollection> {
        let primary = store.open_map(name)?;

        let unique_indexes = DashMap::new();
        for field_name in schema.unique_fields() {
            unique_indexes.insert(field_name.clone(), SkipMap::new());
        }

        let collection = RecordCollection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                primary,
                schema,
                unique_indexes,
                write_lock: LockHandle::new(),
            }),
        };

        for (id, document) in collection.inner.primary.entries()? {
            collection.index_document(&document, id);
        }

        log::debug!("Opened collection '{}'", name);
        Ok(collection)
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    /// Returns the number of records in this collection.
    pub fn size(&self) -> StoreResult<u64> {
        self.inner.primary.size()
    }

    /// Inserts a single document into the collection.
    ///
    /// The collection assigns a fresh [RecordId] and returns the stored
    /// document carrying it.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ValidationError] if the document already has an
    /// `_id`, violates the schema, or conflicts with a unique field of an
    /// existing record. A failing insert leaves the collection unchanged.
    pub fn insert(&self, document: Document) -> StoreResult<Document> {
        if document.has_field(DOC_ID) {
            log::error!("Record id is assigned by the store on insert");
            return Err(StoreError::new(
                "record id is assigned by the store and cannot be supplied on insert",
                ErrorKind::ValidationError,
            ));
        }
        self.inner.schema.validate(&document)?;

        let _guard = self.inner.write_lock.write();
        self.check_unique(&document, None)?;

        let mut document = document;
        let id = RecordId::new();
        document.set_id(id);

        self.index_document(&document, id);
        self.inner.primary.put(id, document.clone())?;

        log::debug!("Inserted record {} into '{}'", id, self.inner.name);
        Ok(document)
    }

    /// Inserts multiple documents into the collection, in order.
    ///
    /// The batch is NOT atomic: the first failing document aborts the batch
    /// with the documents before it already persisted.
    pub fn insert_many(&self, documents: Vec<Document>) -> StoreResult<Vec<Document>> {
        let mut stored = Vec::with_capacity(documents.len());
        for document in documents {
            stored.push(self.insert(document)?);
        }
        log::debug!(
            "Inserted {} record(s) into '{}'",
            stored.len(),
            self.inner.name
        );
        Ok(stored)
    }

    /// Finds all documents matching a filter, in id order.
    pub fn find(&self, filter: Filter) -> StoreResult<Vec<Document>> {
        let _guard = self.inner.write_lock.read();
        self.scan(&filter)
    }

    /// Finds documents matching a filter, then applies the options pipeline:
    /// sort, skip, limit, projection — in that order.
    pub fn find_with_options(
        &self,
        filter: Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let _guard = self.inner.write_lock.read();
        let matched = self.scan(&filter)?;
        Ok(apply_options(matched, options))
    }

    /// Finds the first document matching a filter, in id order.
    pub fn find_one(&self, filter: Filter) -> StoreResult<Option<Document>> {
        let _guard = self.inner.write_lock.read();
        Ok(self.scan(&filter)?.into_iter().next())
    }

    /// Retrieves a document by its [RecordId].
    pub fn get_by_id(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        self.inner.primary.get(id)
    }

    /// Replaces the stored record identified by the document's `_id` with
    /// the document (load-mutate-save).
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::NotFoundError] if the document has no `_id` or
    /// no record with that id exists, and a [ErrorKind::ValidationError] if
    /// the document violates the schema or a unique constraint.
    pub fn update_one(&self, document: &Document) -> StoreResult<Document> {
        let Some(id) = document.id() else {
            log::error!("Cannot update a record that has no id");
            return Err(StoreError::new(
                "cannot update a record that has no id",
                ErrorKind::NotFoundError,
            ));
        };
        self.inner.schema.validate(document)?;

        let _guard = self.inner.write_lock.write();
        let Some(existing) = self.inner.primary.get(&id)? else {
            log::error!("No record with id {} in '{}'", id, self.inner.name);
            return Err(StoreError::new(
                &format!("no record with id {}", id),
                ErrorKind::NotFoundError,
            ));
        };
        self.check_unique(document, Some(id))?;

        self.unindex_document(&existing, id);
        self.index_document(document, id);
        self.inner.primary.put(id, document.clone())?;

        log::debug!("Updated record {} in '{}'", id, self.inner.name);
        Ok(document.clone())
    }

    /// Atomically finds the first document matching the filter and applies
    /// the given field updates to it.
    ///
    /// Returns the post-update view of the record, or `None` when nothing
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ValidationError] if the updates name the `_id`
    /// field or the updated record violates the schema or a unique
    /// constraint.
    pub fn find_one_and_update(
        &self,
        filter: Filter,
        updates: &Document,
    ) -> StoreResult<Option<Document>> {
        let _guard = self.inner.write_lock.write();
        let Some(existing) = self.scan(&filter)?.into_iter().next() else {
            return Ok(None);
        };

        let updated = existing.merged_with(updates)?;
        self.inner.schema.validate(&updated)?;

        let id = existing.id().ok_or_else(|| {
            StoreError::new("stored record has no id", ErrorKind::NotFoundError)
        })?;
        self.check_unique(&updated, Some(id))?;

        self.unindex_document(&existing, id);
        self.index_document(&updated, id);
        self.inner.primary.put(id, updated.clone())?;

        log::debug!("Updated record {} in '{}'", id, self.inner.name);
        Ok(Some(updated))
    }

    /// Removes the record with the given id, returning the removed document
    /// or `None` when no such record exists.
    pub fn remove_by_id(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        let _guard = self.inner.write_lock.write();
        let removed = self.inner.primary.remove(id)?;
        if let Some(document) = &removed {
            self.unindex_document(document, *id);
            log::debug!("Removed record {} from '{}'", id, self.inner.name);
        }
        Ok(removed)
    }

    /// Removes all records matching a filter, returning the number removed.
    ///
    /// A filter matching nothing removes nothing and returns 0.
    pub fn remove(&self, filter: Filter) -> StoreResult<u64> {
        let _guard = self.inner.write_lock.write();
        let matched = self.scan(&filter)?;

        let mut count = 0;
        for document in matched {
            let Some(id) = document.id() else { continue };
            if let Some(removed) = self.inner.primary.remove(&id)? {
                self.unindex_document(&removed, id);
                count += 1;
            }
        }

        log::debug!("Removed {} record(s) from '{}'", count, self.inner.name);
        Ok(count)
    }

    /// Removes every record from the collection.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self.inner.write_lock.write();
        self.inner.primary.clear()?;
        for entry in self.inner.unique_indexes.iter() {
            while entry.value().pop_front().is_some() {}
        }
        Ok(())
    }

    // full scan in id order; callers hold whichever lock they need
    fn scan(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        let mut matched = Vec::new();
        for (_, document) in self.inner.primary.entries()? {
            if filter.apply(&document)? {
                matched.push(document);
            }
        }
        Ok(matched)
    }

    // unique checks and index maintenance run under the write lock
    fn check_unique(&self, document: &Document, exclude: Option<RecordId>) -> StoreResult<()> {
        for entry in self.inner.unique_indexes.iter() {
            let value = document.get(entry.key());
            if value.is_null() {
                continue;
            }
            if let Some(existing) = entry.value().get(&value) {
                if Some(*existing.value()) != exclude {
                    log::error!(
                        "Unique constraint violated on field '{}' in '{}'",
                        entry.key(),
                        self.inner.name
                    );
                    return Err(StoreError::new(
                        &format!("unique constraint violated on field '{}'", entry.key()),
                        ErrorKind::ValidationError,
                    ));
                }
            }
        }
        Ok(())
    }

    fn index_document(&self, document: &Document, id: RecordId) {
        for entry in self.inner.unique_indexes.iter() {
            let value = document.get(entry.key());
            if !value.is_null() {
                entry.value().insert(value, id);
            }
        }
    }

    fn unindex_document(&self, document: &Document, id: RecordId) {
        for entry in self.inner.unique_indexes.iter() {
            let value = document.get(entry.key());
            if value.is_null() {
                continue;
            }
            if let Some(existing) = entry.value().get(&value) {
                if *existing.value() == id {
                    existing.remove();
                }
            }
        }
    }
}

// sort -> skip -> limit -> project
fn apply_options(documents: Vec<Document>, options: &FindOptions) -> Vec<Document> {
    let mut documents = documents;

    if let Some((field_name, sort_order)) = &options.sort_by {
        documents = documents
            .into_iter()
            .sorted_by(|a, b| {
                let ordering = a.get(field_name).cmp(&b.get(field_name));
                match sort_order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            })
            .collect();
    }

    if let Some(skip) = options.skip {
        documents.drain(..(skip as usize).min(documents.len()));
    }

    if let Some(limit) = options.limit {
        documents.truncate(limit as usize);
    }

    if let Some(projection) = &options.projection {
        documents = documents
            .iter()
            .map(|document| projection.apply(document))
            .collect();
    }

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{limit_to, order_by, Projection};
    use crate::doc;
    use crate::filter::{all, field};

    fn test_collection() -> RecordCollection {
        let store = RecordStore::connect("memory://collection-tests").unwrap();
        let schema = Schema::new().required("name").unique("name").bounded("age", 5, 150);
        RecordCollection::open(&store, "people", schema).unwrap()
    }

    #[test]
    fn test_insert_assigns_id() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice" }).unwrap();

        assert!(stored.id().is_some());
        assert_eq!(collection.size().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_preset_id() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice" }).unwrap();

        // reinserting a stored document carries its id and must fail
        let err = collection.insert(stored).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert_eq!(collection.size().unwrap(), 1);
    }

    #[test]
    fn test_insert_enforces_unique_name() {
        let collection = test_collection();
        collection.insert(doc! { name: "Alice" }).unwrap();

        let err = collection.insert(doc! { name: "Alice" }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(err.message().contains("unique"));
        assert_eq!(collection.size().unwrap(), 1);
    }

    #[test]
    fn test_insert_enforces_schema() {
        let collection = test_collection();

        let err = collection.insert(doc! { age: 30 }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        let err = collection.insert(doc! { name: "Old", age: 200 }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert_eq!(collection.size().unwrap(), 0);
    }

    #[test]
    fn test_insert_many_preserves_order() {
        let collection = test_collection();
        let stored = collection
            .insert_many(vec![doc! { name: "a" }, doc! { name: "b" }, doc! { name: "c" }])
            .unwrap();

        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].get("name"), Value::from("a"));
        assert_eq!(stored[2].get("name"), Value::from("c"));
    }

    #[test]
    fn test_insert_many_is_not_atomic() {
        let collection = test_collection();
        let err = collection
            .insert_many(vec![doc! { name: "a" }, doc! { name: "a" }, doc! { name: "b" }])
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        // the record before the failure stays persisted, the one after is absent
        assert_eq!(collection.size().unwrap(), 1);
        assert!(collection.find_one(field("name").eq("b")).unwrap().is_none());
    }

    #[test]
    fn test_find_and_find_one() {
        let collection = test_collection();
        collection.insert(doc! { name: "a", age: 25 }).unwrap();
        collection.insert(doc! { name: "b", age: 25 }).unwrap();
        collection.insert(doc! { name: "c", age: 30 }).unwrap();

        assert_eq!(collection.find(all()).unwrap().len(), 3);
        assert_eq!(collection.find(field("age").eq(25)).unwrap().len(), 2);
        assert_eq!(collection.find(field("age").eq(99)).unwrap().len(), 0);

        let first = collection.find_one(field("age").eq(25)).unwrap().unwrap();
        assert_eq!(first.get("name"), Value::from("a"));
        assert!(collection.find_one(field("age").eq(99)).unwrap().is_none());
    }

    #[test]
    fn test_get_by_id_round_trip() {
        let collection = test_collection();
        let stored = collection
            .insert(doc! { name: "Alice", favorite_foods: ["Sushi"] })
            .unwrap();
        let id = stored.id().unwrap();

        let loaded = collection.get_by_id(&id).unwrap().unwrap();
        assert_eq!(loaded, stored);

        assert!(collection.get_by_id(&RecordId::new()).unwrap().is_none());
    }

    #[test]
    fn test_update_one_replaces_record() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice", age: 30 }).unwrap();

        let mut mutated = stored.clone();
        mutated.put("age", 31).unwrap();
        let updated = collection.update_one(&mutated).unwrap();

        assert_eq!(updated.get("age"), Value::from(31));
        let loaded = collection.get_by_id(&stored.id().unwrap()).unwrap().unwrap();
        assert_eq!(loaded.get("age"), Value::from(31));
    }

    #[test]
    fn test_update_one_without_id_is_not_found() {
        let collection = test_collection();
        let err = collection.update_one(&doc! { name: "ghost" }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFoundError);
    }

    #[test]
    fn test_update_one_with_unknown_id_is_not_found() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice" }).unwrap();
        collection.remove_by_id(&stored.id().unwrap()).unwrap();

        let err = collection.update_one(&stored).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFoundError);
    }

    #[test]
    fn test_update_one_can_keep_unique_value() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice", age: 30 }).unwrap();

        // same unique value on the same record is not a conflict
        let mut mutated = stored.clone();
        mutated.put("age", 31).unwrap();
        assert!(collection.update_one(&mutated).is_ok());
    }

    #[test]
    fn test_update_one_rejects_unique_conflict() {
        let collection = test_collection();
        collection.insert(doc! { name: "Alice" }).unwrap();
        let bob = collection.insert(doc! { name: "Bob" }).unwrap();

        let mut renamed = bob.clone();
        renamed.put("name", "Alice").unwrap();
        let err = collection.update_one(&renamed).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_find_one_and_update() {
        let collection = test_collection();
        collection.insert(doc! { name: "John Doe", age: 25 }).unwrap();

        let updated = collection
            .find_one_and_update(field("name").eq("John Doe"), &doc! { age: 20 })
            .unwrap()
            .unwrap();

        assert_eq!(updated.get("age"), Value::from(20));
        assert_eq!(updated.get("name"), Value::from("John Doe"));

        // the stored record reflects the update
        let loaded = collection.find_one(field("name").eq("John Doe")).unwrap().unwrap();
        assert_eq!(loaded.get("age"), Value::from(20));
    }

    #[test]
    fn test_find_one_and_update_no_match_returns_none() {
        let collection = test_collection();
        let result = collection
            .find_one_and_update(field("name").eq("nobody"), &doc! { age: 20 })
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_find_one_and_update_validates_updates() {
        let collection = test_collection();
        collection.insert(doc! { name: "John Doe", age: 25 }).unwrap();

        let err = collection
            .find_one_and_update(field("name").eq("John Doe"), &doc! { age: 200 })
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        // the stored record is untouched
        let loaded = collection.find_one(field("name").eq("John Doe")).unwrap().unwrap();
        assert_eq!(loaded.get("age"), Value::from(25));
    }

    #[test]
    fn test_remove_by_id() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice" }).unwrap();
        let id = stored.id().unwrap();

        let removed = collection.remove_by_id(&id).unwrap().unwrap();
        assert_eq!(removed, stored);
        assert!(collection.get_by_id(&id).unwrap().is_none());

        // removing again finds nothing
        assert!(collection.remove_by_id(&id).unwrap().is_none());
    }

    #[test]
    fn test_remove_by_id_releases_unique_value() {
        let collection = test_collection();
        let stored = collection.insert(doc! { name: "Alice" }).unwrap();
        collection.remove_by_id(&stored.id().unwrap()).unwrap();

        // the unique value is free again
        assert!(collection.insert(doc! { name: "Alice" }).is_ok());
    }

    #[test]
    fn test_remove_many() {
        let collection = test_collection();
        collection.insert(doc! { name: "a", age: 25 }).unwrap();
        collection.insert(doc! { name: "b", age: 25 }).unwrap();
        collection.insert(doc! { name: "c", age: 30 }).unwrap();

        assert_eq!(collection.remove(field("age").eq(25)).unwrap(), 2);
        assert_eq!(collection.size().unwrap(), 1);

        // no matches removes nothing and is not an error
        assert_eq!(collection.remove(field("name").eq("Mary")).unwrap(), 0);
    }

    #[test]
    fn test_find_with_options_pipeline() {
        let collection = test_collection();
        collection.insert(doc! { name: "John Doe", age: 25 }).unwrap();
        collection.insert(doc! { name: "Jane Smith", age: 30 }).unwrap();
        collection.insert(doc! { name: "Jane Dickson", age: 25 }).unwrap();

        let options = order_by("name", SortOrder::Ascending)
            .limit(2)
            .project(Projection::exclude(&["age"]));
        let results = collection.find_with_options(all(), &options).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get("name"), Value::from("Jane Dickson"));
        assert_eq!(results[1].get("name"), Value::from("Jane Smith"));
        assert!(!results[0].has_field("age"));
        assert!(!results[1].has_field("age"));
    }

    #[test]
    fn test_find_with_options_descending_and_skip() {
        let collection = test_collection();
        collection.insert(doc! { name: "a" }).unwrap();
        collection.insert(doc! { name: "b" }).unwrap();
        collection.insert(doc! { name: "c" }).unwrap();

        let options = order_by("name", SortOrder::Descending).skip(1);
        let results = collection.find_with_options(all(), &options).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get("name"), Value::from("b"));
        assert_eq!(results[1].get("name"), Value::from("a"));
    }

    #[test]
    fn test_limit_to_without_sort() {
        let collection = test_collection();
        collection.insert(doc! { name: "a" }).unwrap();
        collection.insert(doc! { name: "b" }).unwrap();

        let results = collection.find_with_options(all(), &limit_to(1)).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_clear() {
        let collection = test_collection();
        collection.insert(doc! { name: "a" }).unwrap();
        collection.clear().unwrap();

        assert_eq!(collection.size().unwrap(), 0);
        // unique values are released as well
        assert!(collection.insert(doc! { name: "a" }).is_ok());
    }

    #[test]
    fn test_reopen_rebuilds_unique_indexes() {
        let store = RecordStore::connect("memory://reopen-tests").unwrap();
        let schema = Schema::new().required("name").unique("name");

        let collection = RecordCollection::open(&store, "people", schema.clone()).unwrap();
        collection.insert(doc! { name: "Alice" }).unwrap();

        let reopened = RecordCollection::open(&store, "people", schema).unwrap();
        let err = reopened.insert(doc! { name: "Alice" }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }
}
