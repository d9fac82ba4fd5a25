//! # persondb - Embedded Person Record Store
//!
//! persondb is a small embedded record store for person records. It provides
//! schema-validated document storage with rich equality filters, sorted and
//! projected queries, and a typed repository over the `"people"` collection.
//!
//! ## Key Features
//!
//! - **Embedded**: no separate server process required
//! - **Schema enforcement**: required fields, unique fields, bounded values,
//!   all checked at write time
//! - **Filters**: fluent field-equality filters with array-membership
//!   semantics, composable with and/or/not
//! - **Query pipeline**: sort, skip, limit, and field projection
//! - **Typed repository**: the [repository::People] client maps records to
//!   [repository::Person] values
//! - **Pluggable storage**: collection code talks to the
//!   [store::RecordStoreProvider] seam; an in-memory backend is bundled
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use persondb::filter::field;
//! use persondb::repository::{person, People, Person};
//! use persondb::store::RecordStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect to a store
//! let store = RecordStore::connect("memory://persondb")?;
//!
//! // Open the typed people repository
//! let people = People::open(&store)?;
//!
//! // Insert a person
//! let john = people.insert(
//!     &Person::new("John Doe").with_age(25).with_favorite_foods(["Pizza", "Burger"]),
//! )?;
//!
//! // Query by field
//! let found = people.find(field(person::NAME).eq("John Doe"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, record ids, find options, and the
//!   schema-enforcing record collection
//! - [`common`] - Value model, sort order, and shared utilities
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters and the fluent filter builder
//! - [`repository`] - The typed [repository::Person] entity and
//!   [repository::People] client
//! - [`schema`] - Declarative write-time constraints
//! - [`store`] - Storage backend abstractions and the in-memory backend

use crate::collection::snowflake::SnowflakeIdGenerator;
use std::sync::LazyLock;

pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod repository;
pub mod schema;
pub mod store;

pub(crate) static ID_GENERATOR: LazyLock<SnowflakeIdGenerator> =
    LazyLock::new(SnowflakeIdGenerator::new);
