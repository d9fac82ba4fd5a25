use crate::collection::{Document, RecordId};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::{RecordMap, RecordMapProvider, RecordStoreProvider};
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) const SCHEME: &str = "memory";

/// In-memory storage backend.
///
/// Holds a registry of named record maps, entirely in memory. All data is
/// lost when the store is dropped; the store is intended for tests, demos,
/// and ephemeral workloads.
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

struct InMemoryStoreInner {
    name: String,
    maps: DashMap<String, RecordMap>,
    closed: AtomicBool,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store for the named database.
    pub fn new(name: &str) -> Self {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner {
                name: name.to_string(),
                maps: DashMap::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.inner.closed.load(Ordering::Acquire) {
            log::error!("Store '{}' is already closed", self.inner.name);
            return Err(StoreError::new(
                &format!("store '{}' is already closed", self.inner.name),
                ErrorKind::ConnectionError,
            ));
        }
        Ok(())
    }
}

impl RecordStoreProvider for InMemoryStore {
    fn store_name(&self) -> String {
        self.inner.name.clone()
    }

    fn open_map(&self, name: &str) -> StoreResult<RecordMap> {
        self.check_open()?;
        let map = self
            .inner
            .maps
            .entry(name.to_string())
            .or_insert_with(|| RecordMap::new(InMemoryMap::new(name)))
            .value()
            .clone();
        Ok(map)
    }

    fn has_map(&self, name: &str) -> bool {
        self.inner.maps.contains_key(name)
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    fn close(&self) -> StoreResult<()> {
        self.inner.closed.store(true, Ordering::Release);
        log::debug!("Closed in-memory store '{}'", self.inner.name);
        Ok(())
    }
}

/// In-memory record map backed by a concurrent skip list.
///
/// Entries iterate in id order, which for store-assigned ids is insertion
/// order. Clones share the same underlying state.
#[derive(Clone)]
pub struct InMemoryMap {
    inner: Arc<InMemoryMapInner>,
}

struct InMemoryMapInner {
    name: String,
    data: SkipMap<RecordId, Document>,
}

impl InMemoryMap {
    /// Creates a new empty in-memory map.
    pub fn new(name: &str) -> Self {
        InMemoryMap {
            inner: Arc::new(InMemoryMapInner {
                name: name.to_string(),
                data: SkipMap::new(),
            }),
        }
    }
}

impl RecordMapProvider for InMemoryMap {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn get(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        Ok(self.inner.data.get(id).map(|entry| entry.value().clone()))
    }

    fn put(&self, id: RecordId, document: Document) -> StoreResult<()> {
        self.inner.data.insert(id, document);
        Ok(())
    }

    fn remove(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        Ok(self.inner.data.remove(id).map(|entry| entry.value().clone()))
    }

    fn contains(&self, id: &RecordId) -> StoreResult<bool> {
        Ok(self.inner.data.contains_key(id))
    }

    fn entries(&self) -> StoreResult<Vec<(RecordId, Document)>> {
        Ok(self
            .inner
            .data
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect())
    }

    fn size(&self) -> StoreResult<u64> {
        Ok(self.inner.data.len() as u64)
    }

    fn clear(&self) -> StoreResult<()> {
        while self.inner.data.pop_front().is_some() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_open_map_creates_and_reuses() {
        let store = InMemoryStore::new("testdb");
        assert!(!store.has_map("people"));

        let first = store.open_map("people").unwrap();
        assert!(store.has_map("people"));

        // reopening returns a handle to the same data
        let id = RecordId::new();
        first.put(id, doc! { name: "Alice" }).unwrap();
        let second = store.open_map("people").unwrap();
        assert!(second.contains(&id).unwrap());
    }

    #[test]
    fn test_open_map_fails_on_closed_store() {
        let store = InMemoryStore::new("testdb");
        store.close().unwrap();
        assert!(store.is_closed());

        let err = store.open_map("people").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionError);
    }

    #[test]
    fn test_map_put_get_remove() {
        let map = InMemoryMap::new("people");
        let id = RecordId::new();
        let doc = doc! { name: "Alice" };

        map.put(id, doc.clone()).unwrap();
        assert_eq!(map.get(&id).unwrap(), Some(doc.clone()));
        assert_eq!(map.size().unwrap(), 1);

        assert_eq!(map.remove(&id).unwrap(), Some(doc));
        assert_eq!(map.get(&id).unwrap(), None);
        assert!(map.is_empty().unwrap());
    }

    #[test]
    fn test_put_replaces_existing_document() {
        let map = InMemoryMap::new("people");
        let id = RecordId::new();

        map.put(id, doc! { name: "Alice" }).unwrap();
        map.put(id, doc! { name: "Bob" }).unwrap();

        assert_eq!(map.size().unwrap(), 1);
        let stored = map.get(&id).unwrap().unwrap();
        assert_eq!(stored, doc! { name: "Bob" });
    }

    #[test]
    fn test_entries_in_id_order() {
        let map = InMemoryMap::new("people");
        let first = RecordId::new();
        let second = RecordId::new();

        // insert out of order; iteration is ordered by id
        map.put(second, doc! { name: "b" }).unwrap();
        map.put(first, doc! { name: "a" }).unwrap();

        let ids: Vec<RecordId> = map.entries().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_clear() {
        let map = InMemoryMap::new("people");
        map.put(RecordId::new(), doc! { name: "a" }).unwrap();
        map.put(RecordId::new(), doc! { name: "b" }).unwrap();

        map.clear().unwrap();
        assert!(map.is_empty().unwrap());
    }
}
