use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::ID_GENERATOR;
use once_cell::sync::Lazy;
use std::fmt::{Debug, Display};
use std::str::FromStr;

static MIN_VALUE: Lazy<u64> = Lazy::new(|| 10u64.pow(18));
static MAX_VALUE: Lazy<u64> = Lazy::new(|| 10u64.pow(19));

/// A unique identifier for records in a collection.
///
/// Each record in a collection is uniquely identified by a `RecordId`. The id
/// is assigned by the store when a record is inserted and is immutable
/// thereafter.
///
/// # Id generation
///
/// Ids are produced by a Snowflake-like generator yielding 64-bit unsigned
/// integers in the range [10^18, 10^19). This ensures:
/// - uniqueness across all records
/// - approximate timestamp ordering, so a scan in id order is a scan in
///   insertion order
///
/// # Textual form
///
/// A `RecordId` renders as its decimal value and can be parsed back with
/// [RecordId::parse]. Parsing a string that is not a decimal number in the
/// valid range fails with a [ErrorKind::QueryError].
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct RecordId {
    id_value: u64,
}

impl RecordId {
    /// Generates a new unique `RecordId`.
    pub fn new() -> Self {
        RecordId {
            id_value: ID_GENERATOR.get_id(),
        }
    }

    /// Creates a `RecordId` from a specific value.
    ///
    /// The value must be within the valid range [10^18, 10^19).
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::QueryError] if the value is outside the valid
    /// range.
    pub fn create(id_value: u64) -> StoreResult<RecordId> {
        if id_value >= *MAX_VALUE || id_value < *MIN_VALUE {
            log::error!("Record id {} is out of the valid range", id_value);
            return Err(StoreError::new(
                &format!("malformed record id: {} is out of the valid range", id_value),
                ErrorKind::QueryError,
            ));
        }
        Ok(RecordId { id_value })
    }

    /// Parses a `RecordId` from its textual form.
    ///
    /// # Errors
    ///
    /// Returns a [ErrorKind::QueryError] if the text is not a decimal number
    /// or the value is outside the valid range.
    pub fn parse(text: &str) -> StoreResult<RecordId> {
        let id_value: u64 = text.trim().parse()?;
        RecordId::create(id_value)
    }

    /// Gets the numeric value of this id.
    pub fn id_value(&self) -> u64 {
        self.id_value
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}

impl Debug for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecordId({})", self.id_value)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_id_in_valid_range() {
        let id = RecordId::new();
        assert!(id.id_value() >= *MIN_VALUE);
        assert!(id.id_value() < *MAX_VALUE);
    }

    #[test]
    fn new_generates_distinct_ids() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn create_rejects_out_of_range_values() {
        let too_small = RecordId::create(42);
        assert_eq!(too_small.unwrap_err().kind(), &ErrorKind::QueryError);

        let too_large = RecordId::create(u64::MAX);
        assert_eq!(too_large.unwrap_err().kind(), &ErrorKind::QueryError);
    }

    #[test]
    fn parse_round_trips_display() {
        let id = RecordId::new();
        let parsed = RecordId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        let err = RecordId::parse("65bbbffec337a2ce04033414").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::QueryError);

        let err = RecordId::parse("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::QueryError);
    }

    #[test]
    fn ids_order_by_value() {
        let first = RecordId::new();
        let second = RecordId::new();
        assert!(first < second);
    }
}
