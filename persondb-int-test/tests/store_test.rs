use persondb::errors::ErrorKind;
use persondb::repository::People;
use persondb::store::{RecordStore, RecordStoreProvider};

#[test]
fn test_connect_and_open() {
    let store = RecordStore::connect("memory://int-test").unwrap();
    assert_eq!(store.store_name(), "int-test");

    let people = People::open(&store).unwrap();
    assert_eq!(people.count().unwrap(), 0);
    assert!(store.has_map("people"));
}

#[test]
fn test_connect_rejects_malformed_connection_strings() {
    for uri in ["", "memory", "memory://", "://people", "just-a-name"] {
        let err = RecordStore::connect(uri).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionError, "uri: {}", uri);
    }
}

#[test]
fn test_connect_rejects_unsupported_schemes() {
    let err = RecordStore::connect("mongodb://localhost/people").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ConnectionError);
}

#[test]
fn test_closed_store_refuses_to_open_collections() {
    let store = RecordStore::connect("memory://int-test").unwrap();
    store.close().unwrap();

    let err = People::open(&store).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ConnectionError);
}

#[test]
fn test_stores_are_independent() {
    let first = RecordStore::connect("memory://int-test").unwrap();
    let second = RecordStore::connect("memory://int-test").unwrap();

    let people = People::open(&first).unwrap();
    people
        .insert(&persondb::repository::Person::new("Ibrahim"))
        .unwrap();

    // a second connection is its own store, not a window onto the first
    let other = People::open(&second).unwrap();
    assert_eq!(other.count().unwrap(), 0);
}
