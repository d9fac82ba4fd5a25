//! Typed access to person records.
//!
//! [Person] is the record type; [People] is the typed client over the
//! `"people"` collection with the person schema installed. The `person`
//! module also exposes the field name constants used to build filters:
//!
//! ```rust,ignore
//! use persondb::filter::field;
//! use persondb::repository::person;
//!
//! let by_food = field(person::FAVORITE_FOODS).eq("Pizza");
//! ```

mod people;
pub mod person;

pub use people::{People, COLLECTION_NAME};
pub use person::Person;
