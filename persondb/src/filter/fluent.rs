use crate::common::Value;

use super::{EqualsFilter, Filter, NotEqualsFilter};

/// Creates a fluent filter builder for the specified field name.
///
/// The returned [FluentFilter] provides methods for building equality
/// filters on the field.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::filter::field;
///
/// let by_name = field("name").eq("John Doe");
/// let by_food = field("favorite_foods").eq("Pizza");
/// ```
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Creates a filter that matches records where the field equals the
    /// specified value.
    ///
    /// When the stored field holds an array and the value is a scalar, the
    /// filter matches array membership.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(EqualsFilter::new(self.field_name, value.into()))
    }

    /// Creates a filter that matches records where the field does not equal
    /// the specified value.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(NotEqualsFilter::new(self.field_name, value.into()))
    }
}
