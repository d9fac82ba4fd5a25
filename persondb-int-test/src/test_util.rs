use persondb::repository::{People, Person};
use persondb::store::RecordStore;

/// Opens a fresh in-memory store with a people repository.
///
/// Every call returns an independent store, so tests cannot observe each
/// other's data.
pub fn open_people() -> (RecordStore, People) {
    let store = RecordStore::connect("memory://int-test").expect("failed to connect");
    let people = People::open(&store).expect("failed to open people collection");
    (store, people)
}

/// The demo roster: three people with distinct names, shared ages, and
/// overlapping favorite foods.
pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("John Doe")
            .with_age(25)
            .with_favorite_foods(["Pizza", "Burger"]),
        Person::new("Jane Smith")
            .with_age(30)
            .with_favorite_foods(["Sushi", "Pasta"]),
        Person::new("Jane Dickson")
            .with_age(25)
            .with_favorite_foods(["Pizza", "Sushi", "Burgers"]),
    ]
}
