//! Declarative write-time constraints for a collection.

use crate::collection::Document;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use std::collections::{BTreeMap, BTreeSet};

/// Write-time constraints enforced on every record of a collection.
///
/// A schema declares which fields are required, which must be unique across
/// the collection, and which integer fields are bounded to an inclusive
/// range. Every insert and update validates the record against the schema
/// before anything is persisted; a violating write fails with a
/// [ErrorKind::ValidationError] and leaves the collection unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// use persondb::schema::Schema;
///
/// let schema = Schema::new()
///     .required("name")
///     .unique("name")
///     .bounded("age", 5, 150);
/// ```
#[derive(Clone, Default)]
pub struct Schema {
    required: BTreeSet<String>,
    unique: Vec<String>,
    bounds: BTreeMap<String, (i64, i64)>,
}

impl Schema {
    /// Creates a new schema with no constraints.
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Declares a field that must be present and non-null on every record.
    pub fn required(mut self, field_name: &str) -> Schema {
        self.required.insert(field_name.to_string());
        self
    }

    /// Declares a field whose value must be unique across the collection.
    ///
    /// Uniqueness is enforced by the collection through a unique index;
    /// null and absent values are exempt.
    pub fn unique(mut self, field_name: &str) -> Schema {
        if !self.unique.iter().any(|f| f == field_name) {
            self.unique.push(field_name.to_string());
        }
        self
    }

    /// Declares an integer field bounded to `[min, max]` inclusive.
    ///
    /// Absent and null values pass; a present value must be an integer
    /// within the range.
    pub fn bounded(mut self, field_name: &str, min: i64, max: i64) -> Schema {
        self.bounds.insert(field_name.to_string(), (min, max));
        self
    }

    /// The fields declared unique, in declaration order.
    pub fn unique_fields(&self) -> &[String] {
        &self.unique
    }

    /// Validates a record against this schema.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::ValidationError] naming the offending field if
    /// a required field is missing or null, or a bounded field is not an
    /// integer within its range. Uniqueness is checked separately by the
    /// collection.
    pub fn validate(&self, document: &Document) -> StoreResult<()> {
        for field_name in &self.required {
            if document.get(field_name).is_null() {
                log::error!("Required field '{}' is missing", field_name);
                return Err(StoreError::new(
                    &format!("missing required field '{}'", field_name),
                    ErrorKind::ValidationError,
                ));
            }
        }

        for (field_name, (min, max)) in &self.bounds {
            let value = document.get(field_name);
            if value.is_null() {
                continue;
            }
            match value.as_i64() {
                Some(number) if (*min..=*max).contains(&number) => {}
                Some(number) => {
                    log::error!(
                        "Field '{}' value {} is outside [{}, {}]",
                        field_name,
                        number,
                        min,
                        max
                    );
                    return Err(StoreError::new(
                        &format!(
                            "field '{}' value {} is outside the valid range [{}, {}]",
                            field_name, number, min, max
                        ),
                        ErrorKind::ValidationError,
                    ));
                }
                None => {
                    log::error!("Field '{}' must be an integer", field_name);
                    return Err(StoreError::new(
                        &format!("field '{}' must be an integer", field_name),
                        ErrorKind::ValidationError,
                    ));
                }
            }
        }

        Ok(())
    }
}
