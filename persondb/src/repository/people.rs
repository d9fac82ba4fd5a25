use crate::collection::{Document, FindOptions, RecordCollection, RecordId};
use crate::filter::Filter;
use crate::repository::person::{self, Person};
use crate::store::RecordStore;
use crate::errors::StoreResult;

/// The collection holding person records, named after the entity by
/// convention.
pub const COLLECTION_NAME: &str = "people";

/// A typed client for the people collection.
///
/// `People` owns a handle to the `"people"` collection with the person
/// schema installed and exposes the full operation set at the [Person]
/// level: insert (single and bulk), queries by filter and by id, updates
/// (load-mutate-save and atomic find-and-update), deletes (single and
/// bulk), and compound queries.
///
/// Every operation is an independent request returning an explicit
/// [StoreResult]; "not found" is expressed as `None`, never as an error or
/// a sentinel record.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::filter::field;
/// use persondb::repository::{person, People, Person};
/// use persondb::store::RecordStore;
///
/// let store = RecordStore::connect("memory://persondb")?;
/// let people = People::open(&store)?;
///
/// let john = people.insert(
///     &Person::new("John Doe").with_age(25).with_favorite_foods(["Pizza", "Burger"]),
/// )?;
/// let found = people.find_one(field(person::NAME).eq("John Doe"))?;
/// ```
#[derive(Clone)]
pub struct People {
    collection: RecordCollection,
}

impl std::fmt::Debug for People {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("People").finish_non_exhaustive()
    }
}

impl People {
    /// Opens the people collection in the given store.
    pub fn open(store: &RecordStore) -> StoreResult<People> {
        let collection = RecordCollection::open(store, COLLECTION_NAME, person::schema())?;
        Ok(People { collection })
    }

    /// Returns the underlying document-level collection.
    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    /// Inserts a person, returning the persisted record with its assigned
    /// id.
    pub fn insert(&self, person: &Person) -> StoreResult<Person> {
        let stored = self.collection.insert(person.to_document()?)?;
        Person::from_document(&stored)
    }

    /// Inserts several people in order, returning the persisted records.
    ///
    /// The batch is NOT atomic: the first failing record aborts the batch
    /// with the records before it already persisted.
    pub fn insert_many(&self, people: &[Person]) -> StoreResult<Vec<Person>> {
        let mut stored = Vec::with_capacity(people.len());
        for person in people {
            stored.push(self.insert(person)?);
        }
        Ok(stored)
    }

    /// Finds all people matching a filter, in insertion order.
    pub fn find(&self, filter: Filter) -> StoreResult<Vec<Person>> {
        self.collection
            .find(filter)?
            .iter()
            .map(Person::from_document)
            .collect()
    }

    /// Finds matching records and applies sorting, pagination, and
    /// projection.
    ///
    /// Returns documents rather than [Person]s: a projection may remove
    /// fields a `Person` requires.
    pub fn find_with_options(
        &self,
        filter: Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        self.collection.find_with_options(filter, options)
    }

    /// Finds the first person matching a filter.
    pub fn find_one(&self, filter: Filter) -> StoreResult<Option<Person>> {
        match self.collection.find_one(filter)? {
            Some(document) => Ok(Some(Person::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Finds a person by id.
    pub fn find_by_id(&self, id: &RecordId) -> StoreResult<Option<Person>> {
        match self.collection.get_by_id(id)? {
            Some(document) => Ok(Some(Person::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Persists an in-memory mutation of a previously loaded person
    /// (load-mutate-save).
    ///
    /// # Errors
    ///
    /// Fails with a [crate::errors::ErrorKind::NotFoundError] if the person
    /// has no id or no record with that id exists, and with a
    /// [crate::errors::ErrorKind::ValidationError] if the mutated state
    /// violates the schema.
    pub fn save(&self, person: &Person) -> StoreResult<Person> {
        let stored = self.collection.update_one(&person.to_document()?)?;
        Person::from_document(&stored)
    }

    /// Atomically finds the first person matching the filter and applies
    /// the given field updates, returning the post-update view or `None`
    /// when nothing matches.
    pub fn find_one_and_update(
        &self,
        filter: Filter,
        updates: &Document,
    ) -> StoreResult<Option<Person>> {
        match self.collection.find_one_and_update(filter, updates)? {
            Some(document) => Ok(Some(Person::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Deletes a person by id, returning the removed record or `None` when
    /// no such person exists.
    pub fn delete_by_id(&self, id: &RecordId) -> StoreResult<Option<Person>> {
        match self.collection.remove_by_id(id)? {
            Some(document) => Ok(Some(Person::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Deletes all people matching a filter, returning the number removed.
    pub fn delete_many(&self, filter: Filter) -> StoreResult<u64> {
        self.collection.remove(filter)
    }

    /// Returns the number of people in the collection.
    pub fn count(&self) -> StoreResult<u64> {
        self.collection.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::field;

    fn open_people() -> People {
        let store = RecordStore::connect("memory://people-tests").unwrap();
        People::open(&store).unwrap()
    }

    #[test]
    fn test_insert_assigns_id_and_preserves_fields() {
        let people = open_people();
        let stored = people
            .insert(
                &Person::new("John Doe")
                    .with_age(25)
                    .with_favorite_foods(["Pizza", "Burger"]),
            )
            .unwrap();

        assert!(stored.id().is_some());
        assert_eq!(stored.name, "John Doe");
        assert_eq!(stored.age, Some(25));
        assert_eq!(stored.favorite_foods, vec!["Pizza", "Burger"]);
    }

    #[test]
    fn test_find_one_returns_none_when_absent() {
        let people = open_people();
        assert!(people
            .find_one(field(person::NAME).eq("nobody"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_collection_uses_conventional_name() {
        let people = open_people();
        assert_eq!(people.collection().name(), "people");
    }

    #[test]
    fn test_count() {
        let people = open_people();
        assert_eq!(people.count().unwrap(), 0);
        people.insert(&Person::new("a")).unwrap();
        people.insert(&Person::new("b")).unwrap();
        assert_eq!(people.count().unwrap(), 2);
    }
}
