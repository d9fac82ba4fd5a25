//! Query filters for selecting records from a collection.
//!
//! Filters are built with the fluent [field] builder and composed with
//! [and], [or], and [not]:
//!
//! ```rust,ignore
//! use persondb::filter::{field, or};
//!
//! let by_name = field("name").eq("John Doe");
//! let by_food = field("favorite_foods").eq("Pizza");
//! let either = or(vec![by_name, by_food]);
//! ```
//!
//! Equality on an array-valued field matches array membership, so
//! `field("favorite_foods").eq("Pizza")` selects records whose food list
//! contains `"Pizza"`.

mod basic_filters;
mod filter;
mod fluent;
mod logical_filters;

pub(crate) use basic_filters::{AllFilter, EqualsFilter, NotEqualsFilter};
pub(crate) use logical_filters::{AndFilter, NotFilter, OrFilter};

pub use filter::{all, and, by_id, not, or, Filter, FilterProvider};
pub use fluent::{field, FluentFilter};
