use crate::collection::{Document, RecordId};
use crate::common::{Value, DOC_ID};
use crate::errors::StoreResult;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::{AllFilter, AndFilter, EqualsFilter, NotFilter, OrFilter};

/// Trait for implementing filters.
///
/// A `FilterProvider` defines how to evaluate a filter condition against a
/// document.
pub trait FilterProvider: Send + Sync + Display {
    /// Applies the filter to a document and returns whether it matches.
    ///
    /// # Errors
    ///
    /// Returns a [crate::errors::ErrorKind::QueryError] when the filter
    /// itself is malformed.
    fn apply(&self, entry: &Document) -> StoreResult<bool>;
}

/// A query filter for selecting records from a collection.
///
/// `Filter` encapsulates filter logic through a provider pattern that
/// supports custom filtering implementations. Filters are used with
/// collection `find()` and similar methods.
///
/// # Filter composition
///
/// Filters can be composed using logical operators:
/// - `and(other)` - combines with another filter using logical AND
/// - `or(other)` - combines with another filter using logical OR
/// - `not()` - negates the filter using logical NOT
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::filter::{all, field};
///
/// let by_name = field("name").eq("John Doe");
/// let by_food = field("favorite_foods").eq("Pizza");
/// let either = by_name.or(by_food);
/// ```
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    /// Creates a new filter from a filter provider implementation.
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter {
            inner: Arc::new(inner),
        }
    }

    /// Combines this filter with another using logical AND.
    pub fn and(&self, filter: Filter) -> Self {
        Filter::new(AndFilter::new(vec![self.clone(), filter]))
    }

    /// Combines this filter with another using logical OR.
    pub fn or(&self, filter: Filter) -> Self {
        Filter::new(OrFilter::new(vec![self.clone(), filter]))
    }

    /// Negates this filter using logical NOT.
    pub fn not(&self) -> Self {
        Filter::new(NotFilter::new(self.clone()))
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Creates a filter that matches all records.
pub fn all() -> Filter {
    Filter::new(AllFilter {})
}

/// Creates a filter that matches a record by its store-assigned id.
pub fn by_id(id: RecordId) -> Filter {
    Filter::new(EqualsFilter::new(DOC_ID.to_string(), Value::Id(id)))
}

/// Combines multiple filters using logical AND.
///
/// Creates a filter that matches records satisfying all of the provided
/// filters.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::new(AndFilter::new(filters))
}

/// Combines multiple filters using logical OR.
///
/// Creates a filter that matches records satisfying at least one of the
/// provided filters.
pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::new(OrFilter::new(filters))
}

/// Negates a filter using logical NOT.
pub fn not(filter: Filter) -> Filter {
    Filter::new(NotFilter::new(filter))
}
