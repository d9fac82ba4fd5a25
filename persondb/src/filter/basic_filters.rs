use std::fmt::Display;

use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, StoreError, StoreResult};

use super::FilterProvider;

/// A filter that matches all records without applying any conditions.
///
/// Commonly used as a default filter when no specific filtering is needed.
pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> StoreResult<bool> {
        Ok(true)
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

// Equality semantics shared by the equals/not-equals filters.
//
// A scalar probe against a stored array matches array membership, so a
// filter on "favorite_foods" == "Pizza" selects records whose food list
// contains "Pizza". An array probe requires whole-array equality.
fn value_matches(stored: &Value, probe: &Value) -> bool {
    match stored {
        Value::Array(elements) if !matches!(probe, Value::Array(_)) => {
            elements.iter().any(|element| element == probe)
        }
        _ => stored == probe,
    }
}

/// A filter that matches records where a field equals a specific value.
///
/// When the stored field holds an array and the probe value is a scalar,
/// the filter matches if any array element equals the probe.
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> StoreResult<bool> {
        if self.field_name.is_empty() {
            log::error!("Equals filter has an empty field name");
            return Err(StoreError::new(
                "malformed filter: field name cannot be empty",
                ErrorKind::QueryError,
            ));
        }
        Ok(value_matches(&entry.get(&self.field_name), &self.field_value))
    }
}

/// A filter that matches records where a field does not equal a specific
/// value.
///
/// The negation of [EqualsFilter], including its array-membership
/// semantics: a scalar probe against a stored array matches records whose
/// array does NOT contain the probe.
pub(crate) struct NotEqualsFilter {
    field_name: String,
    field_value: Value,
}

impl NotEqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        NotEqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for NotEqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} != {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for NotEqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> StoreResult<bool> {
        if self.field_name.is_empty() {
            log::error!("Not-equals filter has an empty field name");
            return Err(StoreError::new(
                "malformed filter: field name cannot be empty",
                ErrorKind::QueryError,
            ));
        }
        Ok(!value_matches(&entry.get(&self.field_name), &self.field_value))
    }
}
