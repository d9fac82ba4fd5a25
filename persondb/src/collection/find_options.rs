use crate::collection::Document;
use crate::common::SortOrder;
use std::collections::BTreeSet;

/// Options for controlling find operations on records.
///
/// `FindOptions` allows you to specify sorting, pagination, and field
/// projection for query results. It supports method chaining for convenient
/// configuration.
///
/// The pipeline order is fixed: matching records are sorted first, then
/// skipped, then truncated to the limit, and finally projected.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::collection::{order_by, FindOptions, Projection};
/// use persondb::common::SortOrder;
///
/// let options = order_by("name", SortOrder::Ascending)
///     .limit(2)
///     .project(Projection::exclude(&["age"]));
/// ```
#[derive(Default)]
pub struct FindOptions {
    pub(crate) sort_by: Option<(String, SortOrder)>,
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) projection: Option<Projection>,
}

/// Creates `FindOptions` with sorting by a field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name, sort_order)
}

/// Creates `FindOptions` that skips a number of results.
///
/// Useful for pagination: skip the first N results and process the remaining.
pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

/// Creates `FindOptions` that limits the number of results.
///
/// Combined with skip for pagination: skip(10).limit(20) returns results 11-30.
pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions::new().limit(limit)
}

/// Creates `FindOptions` that excludes the named fields from each result.
pub fn exclude(fields: &[&str]) -> FindOptions {
    FindOptions::new().project(Projection::exclude(fields))
}

impl FindOptions {
    /// Creates a new `FindOptions` with default settings.
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    /// Sets the field to sort by and the sort direction.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindOptions {
        self.sort_by = Some((field_name.to_string(), sort_order));
        self
    }

    /// Sets the number of records to skip from the beginning.
    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of records to return.
    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Sets the projection applied to each returned record.
    pub fn project(mut self, projection: Projection) -> FindOptions {
        self.projection = Some(projection);
        self
    }
}

/// A field projection removing named fields from query results.
///
/// The projection applies to returned copies only; stored records are never
/// modified.
#[derive(Clone, Default)]
pub struct Projection {
    excluded: BTreeSet<String>,
}

impl Projection {
    /// Creates a projection excluding the named fields.
    pub fn exclude(fields: &[&str]) -> Projection {
        Projection {
            excluded: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Checks whether this projection excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Returns a copy of the document with the excluded fields removed.
    pub fn apply(&self, document: &Document) -> Document {
        let mut projected = document.clone();
        for field_name in &self.excluded {
            projected.remove(field_name);
        }
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_order_by() {
        let options = order_by("name", SortOrder::Ascending);
        assert_eq!(
            options.sort_by,
            Some(("name".to_string(), SortOrder::Ascending))
        );
        assert!(options.skip.is_none());
        assert!(options.limit.is_none());
        assert!(options.projection.is_none());
    }

    #[test]
    fn test_skip_by() {
        let options = skip_by(10);
        assert_eq!(options.skip, Some(10));
        assert!(options.sort_by.is_none());
    }

    #[test]
    fn test_limit_to() {
        let options = limit_to(5);
        assert_eq!(options.limit, Some(5));
        assert!(options.sort_by.is_none());
    }

    #[test]
    fn test_chained_options() {
        let options = order_by("name", SortOrder::Descending).skip(1).limit(2);
        assert_eq!(
            options.sort_by,
            Some(("name".to_string(), SortOrder::Descending))
        );
        assert_eq!(options.skip, Some(1));
        assert_eq!(options.limit, Some(2));
    }

    #[test]
    fn test_projection_removes_excluded_fields() {
        let doc = doc! { name: "John Doe", age: 25 };
        let projected = Projection::exclude(&["age"]).apply(&doc);

        assert!(!projected.has_field("age"));
        assert!(projected.has_field("name"));
        // the source document is untouched
        assert!(doc.has_field("age"));
    }

    #[test]
    fn test_empty_projection_is_identity() {
        let doc = doc! { name: "John Doe" };
        let projection = Projection::default();
        assert!(projection.is_empty());
        assert_eq!(projection.apply(&doc), doc);
    }

    #[test]
    fn test_exclude_helper() {
        let options = exclude(&["age"]);
        assert!(!options.projection.unwrap().is_empty());
    }
}
