//! Runs a fixed sequence of record store operations against the people
//! collection and terminates with an exit code reflecting the outcome:
//! 0 when every operation succeeded, 1 on the first failure.
//!
//! The connection string is read from the `PERSONDB_URI` environment
//! variable (a `.env` file is honoured), defaulting to an in-memory store.

use log::info;
use persondb::collection::{order_by, Projection};
use persondb::common::SortOrder;
use persondb::doc;
use persondb::errors::{ErrorKind, StoreError, StoreResult};
use persondb::filter::field;
use persondb::repository::{person, People, Person};
use persondb::store::RecordStore;
use std::env;
use std::process;

const URI_ENV_VAR: &str = "PERSONDB_URI";
const DEFAULT_URI: &str = "memory://persondb";

fn main() {
    colog::init();

    match run() {
        Ok(()) => process::exit(0),
        Err(err) => {
            log::error!("{}: {}", err.kind(), err);
            process::exit(1);
        }
    }
}

fn run() -> StoreResult<()> {
    if dotenvy::dotenv().is_err() {
        log::debug!("No .env file found, using the process environment");
    }
    let uri = env::var(URI_ENV_VAR).unwrap_or_else(|_| DEFAULT_URI.to_string());

    let store = RecordStore::connect(&uri)?;
    let people = People::open(&store)?;

    // Create an instance of a new person and save it as a new record
    let ibrahim = people.insert(&Person::new("Ibrahim").with_age(27).with_favorite_foods([
        "Spaghetti alla carbonara",
        "Fettuccine Alfredo",
        "Lasagne",
        "Pesto pasta",
        "Bolognese",
    ]))?;
    info!("The new person has been saved: {:?}", ibrahim);

    // Create an array of people and insert them into the collection
    let created = people.insert_many(&[
        Person::new("John Doe")
            .with_age(25)
            .with_favorite_foods(["Pizza", "Burger"]),
        Person::new("Jane Smith")
            .with_age(30)
            .with_favorite_foods(["Sushi", "Pasta"]),
        Person::new("Jane Dickson")
            .with_age(25)
            .with_favorite_foods(["Pizza", "Sushi", "Burgers"]),
    ])?;
    info!("People created: {:?}", created);

    // Find people with the name 'John Doe'
    let found = people.find(field(person::NAME).eq("John Doe"))?;
    info!("People with the name John Doe: {:?}", found);

    // Find a person based on their favorite food
    let food = "Pizza";
    match people.find_one(field(person::FAVORITE_FOODS).eq(food))? {
        Some(found) => info!("Person with '{}' in their favorite foods: {:?}", food, found),
        None => info!("No person found with '{}' in their favorite foods.", food),
    }

    // Find a person by id
    let person_id = ibrahim.id().ok_or_else(|| {
        StoreError::new("inserted person has no id", ErrorKind::NotFoundError)
    })?;
    match people.find_by_id(&person_id)? {
        Some(found) => info!("Person found by id '{}': {:?}", person_id, found),
        None => info!("No person found with id '{}'.", person_id),
    }

    // Update a person's favorite foods by id: load, mutate in memory, save
    let mut loaded = people.find_by_id(&person_id)?.ok_or_else(|| {
        StoreError::new(
            &format!("no person with id '{}'", person_id),
            ErrorKind::NotFoundError,
        )
    })?;
    loaded.favorite_foods.push("hamburger".to_string());
    let updated = people.save(&loaded)?;
    info!(
        "Person with id '{}' updated with favorite food 'hamburger': {:?}",
        person_id, updated
    );

    // Update a person's age by name
    let person_name = "John Doe";
    match people.find_one_and_update(field(person::NAME).eq(person_name), &doc! { age: 20 })? {
        Some(updated) => info!("{}'s age has been updated to 20: {:?}", person_name, updated),
        None => info!("Couldn't find {}", person_name),
    }

    // Delete a person by id
    match people.delete_by_id(&person_id)? {
        Some(removed) => info!("Person removed: {:?}", removed),
        None => info!("No person found to remove."),
    }

    // Delete multiple people by name
    let removed_count = people.delete_many(field(person::NAME).eq("Mary"))?;
    info!(
        "Number of people with name \"Mary\" deleted: {}",
        removed_count
    );

    // Find people with favorite food 'burritos', sort by name,
    // limit them to 2 and exclude the age field
    let results = people.find_with_options(
        field(person::FAVORITE_FOODS).eq("burritos"),
        &order_by(person::NAME, SortOrder::Ascending)
            .limit(2)
            .project(Projection::exclude(&[person::AGE])),
    )?;
    info!("People: {:?}", results);

    Ok(())
}
