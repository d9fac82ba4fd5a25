//! Storage backend abstractions.
//!
//! A [RecordStore] owns named [RecordMap]s, each mapping record ids to
//! documents. Both are thin wrappers over provider traits so a different
//! backend (or a test double) can be plugged in without touching the
//! collection layer. The only bundled backend is the in-memory store,
//! reached through the `memory://<database>` connection string.

mod memory;

pub use memory::{InMemoryMap, InMemoryStore};

use crate::collection::{Document, RecordId};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::ops::Deref;
use std::sync::Arc;

/// Trait defining the interface for a storage backend.
///
/// A store is a container of named record maps. Implementations handle the
/// lifecycle of the backing storage.
pub trait RecordStoreProvider: Send + Sync {
    /// Returns the name of the database this store holds.
    fn store_name(&self) -> String;

    /// Opens the named record map, creating it if it does not exist.
    ///
    /// Opening the same name twice returns handles to the same map.
    fn open_map(&self, name: &str) -> StoreResult<RecordMap>;

    /// Checks whether the named record map exists.
    fn has_map(&self, name: &str) -> bool;

    /// Checks whether this store has been closed.
    fn is_closed(&self) -> bool;

    /// Closes the store. Operations on a closed store fail with a
    /// [ErrorKind::ConnectionError].
    fn close(&self) -> StoreResult<()>;
}

/// A handle to a storage backend.
///
/// `RecordStore` is an explicitly passed resource: it is acquired once via
/// [RecordStore::connect] and handed to every component that needs storage,
/// which keeps tests free to inject a fresh in-memory store per case.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::store::RecordStore;
///
/// let store = RecordStore::connect("memory://persondb")?;
/// let map = store.open_map("people")?;
/// ```
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<dyn RecordStoreProvider>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("store_name", &self.inner.store_name())
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Creates a new `RecordStore` from a provider implementation.
    pub fn new<T: RecordStoreProvider + 'static>(inner: T) -> Self {
        RecordStore {
            inner: Arc::new(inner),
        }
    }

    /// Connects to the store described by a connection string.
    ///
    /// The connection string has the form `<scheme>://<database>`. The
    /// supported scheme is `memory`, which opens a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ConnectionError] if the connection string is
    /// malformed or names an unsupported scheme.
    pub fn connect(uri: &str) -> StoreResult<RecordStore> {
        let (scheme, database) = parse_uri(uri)?;
        match scheme.as_str() {
            memory::SCHEME => {
                log::info!("Connected to in-memory store '{}'", database);
                Ok(RecordStore::new(InMemoryStore::new(&database)))
            }
            other => {
                log::error!("Unsupported store scheme '{}'", other);
                Err(StoreError::new(
                    &format!("unsupported store scheme '{}'", other),
                    ErrorKind::ConnectionError,
                ))
            }
        }
    }
}

impl Deref for RecordStore {
    type Target = Arc<dyn RecordStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Trait defining the interface for a single record map.
///
/// A record map associates [RecordId]s with [Document]s and iterates its
/// entries in id order, which for store-assigned ids is insertion order.
pub trait RecordMapProvider: Send + Sync {
    /// Returns the name of this map.
    fn name(&self) -> String;

    /// Retrieves the document stored under the given id.
    fn get(&self, id: &RecordId) -> StoreResult<Option<Document>>;

    /// Stores a document under the given id, replacing any previous value.
    fn put(&self, id: RecordId, document: Document) -> StoreResult<()>;

    /// Removes the document stored under the given id, returning it.
    fn remove(&self, id: &RecordId) -> StoreResult<Option<Document>>;

    /// Checks whether a document is stored under the given id.
    fn contains(&self, id: &RecordId) -> StoreResult<bool>;

    /// Returns a snapshot of all entries in id order.
    fn entries(&self) -> StoreResult<Vec<(RecordId, Document)>>;

    /// Returns the number of stored documents.
    fn size(&self) -> StoreResult<u64>;

    /// Checks whether the map holds no documents.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.size()? == 0)
    }

    /// Removes all documents from the map.
    fn clear(&self) -> StoreResult<()>;
}

/// A handle to a named record map.
#[derive(Clone)]
pub struct RecordMap {
    inner: Arc<dyn RecordMapProvider>,
}

impl std::fmt::Debug for RecordMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordMap")
            .field("name", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl RecordMap {
    /// Creates a new `RecordMap` from a provider implementation.
    pub fn new<T: RecordMapProvider + 'static>(inner: T) -> Self {
        RecordMap {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for RecordMap {
    type Target = Arc<dyn RecordMapProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

fn parse_uri(uri: &str) -> StoreResult<(String, String)> {
    let Some((scheme, database)) = uri.split_once("://") else {
        log::error!("Malformed connection string '{}'", uri);
        return Err(StoreError::new(
            &format!("malformed connection string '{}'", uri),
            ErrorKind::ConnectionError,
        ));
    };

    if scheme.is_empty() || database.is_empty() {
        log::error!("Malformed connection string '{}'", uri);
        return Err(StoreError::new(
            &format!("malformed connection string '{}'", uri),
            ErrorKind::ConnectionError,
        ));
    }

    Ok((scheme.to_string(), database.to_string()))
}
