use std::fmt::Display;

use itertools::Itertools;

use crate::collection::Document;
use crate::errors::{ErrorKind, StoreError, StoreResult};

use super::{Filter, FilterProvider};

/// A filter matching records that satisfy all of its child filters.
pub(crate) struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        AndFilter { filters }
    }
}

impl Display for AndFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.filters.iter().map(|x| x.to_string()).join(" && "))
    }
}

impl FilterProvider for AndFilter {
    fn apply(&self, entry: &Document) -> StoreResult<bool> {
        if self.filters.is_empty() {
            log::error!("And filter requires at least one filter");
            return Err(StoreError::new(
                "malformed filter: and requires at least one filter",
                ErrorKind::QueryError,
            ));
        }
        for filter in &self.filters {
            if !filter.apply(entry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// A filter matching records that satisfy at least one of its child filters.
pub(crate) struct OrFilter {
    filters: Vec<Filter>,
}

impl OrFilter {
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        OrFilter { filters }
    }
}

impl Display for OrFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.filters.iter().map(|x| x.to_string()).join(" || "))
    }
}

impl FilterProvider for OrFilter {
    fn apply(&self, entry: &Document) -> StoreResult<bool> {
        if self.filters.is_empty() {
            log::error!("Or filter requires at least one filter");
            return Err(StoreError::new(
                "malformed filter: or requires at least one filter",
                ErrorKind::QueryError,
            ));
        }
        for filter in &self.filters {
            if filter.apply(entry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// A filter matching records that do NOT satisfy its child filter.
pub(crate) struct NotFilter {
    filter: Filter,
}

impl NotFilter {
    pub(crate) fn new(filter: Filter) -> Self {
        NotFilter { filter }
    }
}

impl Display for NotFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!({})", self.filter)
    }
}

impl FilterProvider for NotFilter {
    fn apply(&self, entry: &Document) -> StoreResult<bool> {
        Ok(!self.filter.apply(entry)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::doc;
    use crate::errors::ErrorKind;
    use crate::filter::{all, and, field, not, or, FilterProvider};

    #[test]
    fn test_and_filter() {
        let doc = doc! { name: "John Doe", age: 25 };

        let matching = and(vec![field("name").eq("John Doe"), field("age").eq(25)]);
        assert!(matching.apply(&doc).unwrap());

        let failing = and(vec![field("name").eq("John Doe"), field("age").eq(30)]);
        assert!(!failing.apply(&doc).unwrap());
    }

    #[test]
    fn test_or_filter() {
        let doc = doc! { name: "John Doe", age: 25 };

        let matching = or(vec![field("name").eq("Jane Smith"), field("age").eq(25)]);
        assert!(matching.apply(&doc).unwrap());

        let failing = or(vec![field("name").eq("Jane Smith"), field("age").eq(30)]);
        assert!(!failing.apply(&doc).unwrap());
    }

    #[test]
    fn test_not_filter() {
        let doc = doc! { name: "John Doe" };

        assert!(!not(all()).apply(&doc).unwrap());
        assert!(not(field("name").eq("Jane Smith")).apply(&doc).unwrap());
    }

    #[test]
    fn test_empty_logical_filters_are_query_errors() {
        let doc = doc! { name: "John Doe" };

        let err = and(vec![]).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::QueryError);

        let err = or(vec![]).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::QueryError);
    }

    #[test]
    fn test_error_propagates_through_composition() {
        let doc = doc! { name: "John Doe" };

        let err = and(vec![all(), field("").eq(1)]).apply(&doc).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::QueryError);
    }
}
