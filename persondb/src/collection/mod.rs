//! Collections and documents for record storage.
//!
//! # Documents
//!
//! A [Document] is a flat key-value map where keys are strings and values
//! are [crate::common::Value]s. The reserved `_id` field holds the record's
//! store-assigned [RecordId].
//!
//! ```rust,ignore
//! use persondb::doc;
//!
//! let person = doc! {
//!     name: "John Doe",
//!     age: 25,
//!     favorite_foods: ["Pizza", "Burger"]
//! };
//! ```
//!
//! # Collections
//!
//! A [RecordCollection] manages documents of the same logical type and
//! enforces its [crate::schema::Schema] on every write: required fields,
//! bounded values, and unique fields.
//!
//! ```rust,ignore
//! use persondb::filter::field;
//!
//! let stored = collection.insert(doc! { name: "Alice" })?;
//! let results = collection.find(field("name").eq("Alice"))?;
//! ```
//!
//! # Record ids
//!
//! Each stored record carries a unique `_id` containing a [RecordId],
//! generated with a Snowflake-style algorithm when the record is inserted.
//! Ids are immutable; updates that touch `_id` fail.

mod document;
mod find_options;
mod record_collection;
mod record_id;
pub(crate) mod snowflake;

pub use document::Document;
pub use find_options::{exclude, limit_to, order_by, skip_by, FindOptions, Projection};
pub use record_collection::RecordCollection;
pub use record_id::RecordId;
